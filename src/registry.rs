//! Patient registry: a fixed-size chained hash table keyed by patient name.

use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::models::{Patient, SlotTime};

/// Default bucket count. Prime, to spread collisions.
pub const DEFAULT_BUCKETS: usize = 101;

/// Fold the bytes of `name` with shift-and-add into a 32-bit accumulator.
pub fn hash_name(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |acc, byte| (acc << 5).wrapping_add(u32::from(byte)))
}

/// One bucket's collision chain. The head of the chain is the last element,
/// so linking a new entry at the head is a push.
#[derive(Debug, Clone, Default)]
struct Chain {
    entries: Vec<Patient>,
}

impl Chain {
    fn push_head(&mut self, patient: Patient) {
        self.entries.push(patient);
    }

    /// The most recently linked entry. Only called right after `push_head`.
    fn head(&self) -> &Patient {
        &self.entries[self.entries.len() - 1]
    }

    /// Head to tail.
    fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.entries.iter().rev()
    }

    fn find(&self, name: &str) -> Option<&Patient> {
        self.iter().find(|patient| patient.name == name)
    }

    /// Unlink the first match walking from the head.
    fn unlink(&mut self, name: &str) -> Option<Patient> {
        let position = self.entries.iter().rposition(|patient| patient.name == name)?;
        Some(self.entries.remove(position))
    }
}

#[derive(Debug, Clone)]
pub struct PatientRegistry {
    buckets: Vec<Chain>,
    len: usize,
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a fixed bucket count. A zero count is bumped to one.
    pub fn with_buckets(bucket_count: usize) -> Self {
        PatientRegistry {
            buckets: vec![Chain::default(); bucket_count.max(1)],
            len: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket that `name` hashes to. Stable for the registry's lifetime.
    pub fn bucket_of(&self, name: &str) -> usize {
        hash_name(name) as usize % self.buckets.len()
    }

    /// Register `name` against `time`, linking the entry at the head of its
    /// bucket. A name that is already registered is rejected.
    pub fn add(&mut self, name: &str, time: SlotTime) -> Result<&Patient, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let index = self.bucket_of(name);
        let chain = &mut self.buckets[index];
        if chain.find(name).is_some() {
            warn!(patient = name, bucket = index, "rejected duplicate patient");
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        chain.push_head(Patient::new(name.to_string(), time));
        self.len += 1;
        debug!(patient = name, %time, bucket = index, "patient added");

        Ok(chain.head())
    }

    /// Unlink and return the entry for `name`.
    pub fn remove(&mut self, name: &str) -> Result<Patient, RegistryError> {
        let index = self.bucket_of(name);
        let patient = self.buckets[index]
            .unlink(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.len -= 1;
        debug!(patient = name, bucket = index, "patient removed");
        Ok(patient)
    }

    /// Point an existing entry at a new time, keeping its id and chain position.
    pub(crate) fn reassign(
        &mut self,
        name: &str,
        time: SlotTime,
    ) -> Result<&Patient, RegistryError> {
        let index = self.bucket_of(name);
        let patient = self.buckets[index]
            .entries
            .iter_mut()
            .rev()
            .find(|patient| patient.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        patient.appointment_time = time;
        Ok(&*patient)
    }

    pub fn find(&self, name: &str) -> Option<&Patient> {
        self.buckets[self.bucket_of(name)].find(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Every entry, buckets in index order and each chain head to tail.
    /// The order is not sorted by name or time.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.buckets.iter().flat_map(|chain| chain.iter())
    }

    /// All current `(name, time)` pairs, each exactly once.
    pub fn enumerate(&self) -> Vec<(String, SlotTime)> {
        self.iter()
            .map(|patient| (patient.name.clone(), patient.appointment_time))
            .collect()
    }

    /// Patients whose appointment is at `time`.
    pub fn patients_at(&self, time: SlotTime) -> Vec<&Patient> {
        self.iter()
            .filter(|patient| patient.appointment_time == time)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry, keeping the bucket count.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.entries.clear();
        }
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(label: &str) -> SlotTime {
        label.parse().unwrap()
    }

    /// Names that land in the same bucket of a tiny table.
    fn colliding_names(buckets: usize) -> (String, String) {
        let first = "a".to_string();
        let target = hash_name(&first) as usize % buckets;
        let second = (b'b'..=b'z')
            .map(|c| (c as char).to_string())
            .find(|name| hash_name(name) as usize % buckets == target)
            .unwrap();
        (first, second)
    }

    #[test]
    fn hash_is_shift_and_add() {
        assert_eq!(hash_name(""), 0);
        assert_eq!(hash_name("A"), 65);
        assert_eq!(hash_name("AB"), (65 << 5) + 66);
        let registry = PatientRegistry::new();
        assert_eq!(registry.bucket_count(), 101);
        assert_eq!(registry.bucket_of("AB"), ((65 << 5) + 66) % 101);
        assert_eq!(registry.bucket_of("Aditya"), registry.bucket_of("Aditya"));
    }

    #[test]
    fn hash_wraps_on_long_names() {
        let name = "x".repeat(64);
        let expected = name
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(32).wrapping_add(b as u32));
        assert_eq!(hash_name(&name), expected);
    }

    #[test]
    fn add_then_remove_round_trip() {
        let mut registry = PatientRegistry::new();
        let added = registry.add("Aditya", t("10:00")).unwrap();
        assert_eq!(added.name, "Aditya");

        assert_eq!(
            registry.enumerate(),
            vec![("Aditya".to_string(), t("10:00"))]
        );

        let removed = registry.remove("Aditya").unwrap();
        assert_eq!(removed.appointment_time, t("10:00"));
        assert!(registry.enumerate().iter().all(|(name, _)| name != "Aditya"));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_missing_leaves_entries_alone() {
        let mut registry = PatientRegistry::new();
        assert_eq!(
            registry.remove("Ghost"),
            Err(RegistryError::NotFound("Ghost".to_string()))
        );

        registry.add("Mukul", t("10:00")).unwrap();
        assert_eq!(
            registry.remove("Ghost"),
            Err(RegistryError::NotFound("Ghost".to_string()))
        );
        assert_eq!(registry.enumerate(), vec![("Mukul".to_string(), t("10:00"))]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = PatientRegistry::new();
        registry.add("Aditya", t("10:00")).unwrap();

        assert_eq!(
            registry.add("Aditya", t("11:00")).unwrap_err(),
            RegistryError::Duplicate("Aditya".to_string())
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("Aditya").unwrap().appointment_time, t("10:00"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = PatientRegistry::new();
        assert_eq!(
            registry.add("", t("10:00")).unwrap_err(),
            RegistryError::EmptyName
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn chain_is_walked_head_first() {
        let (older, newer) = colliding_names(3);
        let mut registry = PatientRegistry::with_buckets(3);
        registry.add(&older, t("09:00")).unwrap();
        registry.add(&newer, t("09:30")).unwrap();

        let names: Vec<String> = registry.enumerate().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![newer.clone(), older.clone()]);

        registry.remove(&older).unwrap();
        assert_eq!(registry.find(&newer).unwrap().appointment_time, t("09:30"));
        assert!(registry.find(&older).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn enumerate_visits_every_entry_once() {
        let mut registry = PatientRegistry::with_buckets(7);
        let names = ["Aditya", "Mukul", "Priya", "Rahul", "Sana", "Tara", "Uma", "Vik"];
        for (i, name) in names.iter().enumerate() {
            let time = SlotTime::from_hm(9 + i as u32, 0).unwrap();
            registry.add(name, time).unwrap();
        }

        let mut listed: Vec<String> = registry.enumerate().into_iter().map(|(n, _)| n).collect();
        listed.sort();
        let mut expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        expected.sort();
        assert_eq!(listed, expected);
        assert_eq!(registry.len(), names.len());
    }

    #[test]
    fn patients_at_and_clear() {
        let mut registry = PatientRegistry::new();
        registry.add("Aditya", t("10:00")).unwrap();
        registry.add("Mukul", t("10:00")).unwrap();
        registry.add("Priya", t("11:00")).unwrap();

        assert_eq!(registry.patients_at(t("10:00")).len(), 2);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.bucket_count(), 101);
        assert!(registry.enumerate().is_empty());
    }

    #[test]
    fn zero_buckets_is_bumped() {
        let registry = PatientRegistry::with_buckets(0);
        assert_eq!(registry.bucket_count(), 1);
    }
}
