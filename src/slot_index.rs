//! Ordered index over the day's time slots.
//!
//! Slots are keyed by their `HH:MM` label and kept in chronological order.
//! Each slot is either free or booked; slots are never removed once seeded.

use std::collections::BTreeMap;
use std::ops::Bound;

use tracing::{debug, warn};

use crate::error::SlotError;
use crate::models::{SlotTime, TimeSlot};

/// Result of a successful `book` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    Booked,
    AlreadyBooked,
}

/// Result of a successful `cancel` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotBooked,
}

#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    slots: BTreeMap<SlotTime, TimeSlot>,
}

impl SlotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an index from an ordered catalog. Stops at the first duplicate.
    pub fn with_catalog<I>(catalog: I) -> Result<Self, SlotError>
    where
        I: IntoIterator<Item = SlotTime>,
    {
        let mut index = Self::new();
        for time in catalog {
            index.insert(time)?;
        }
        Ok(index)
    }

    /// Insert a new free slot. A label that is already present is rejected
    /// and the existing slot keeps its state.
    pub fn insert(&mut self, time: SlotTime) -> Result<(), SlotError> {
        if self.slots.contains_key(&time) {
            warn!(%time, "rejected duplicate time slot");
            return Err(SlotError::Duplicate(time));
        }
        self.slots.insert(time, TimeSlot::new(time));
        debug!(%time, "inserted time slot");
        Ok(())
    }

    pub fn exists(&self, time: SlotTime) -> bool {
        self.slots.contains_key(&time)
    }

    pub fn get(&self, time: SlotTime) -> Option<&TimeSlot> {
        self.slots.get(&time)
    }

    pub fn is_booked(&self, time: SlotTime) -> Option<bool> {
        self.get(time).map(|slot| slot.is_booked)
    }

    /// Mark a slot booked.
    pub fn book(&mut self, time: SlotTime) -> Result<BookOutcome, SlotError> {
        let slot = self
            .slots
            .get_mut(&time)
            .ok_or(SlotError::NotFound(time))?;

        if slot.is_booked {
            debug!(%time, "slot already booked");
            return Ok(BookOutcome::AlreadyBooked);
        }

        slot.is_booked = true;
        debug!(%time, "slot booked");
        Ok(BookOutcome::Booked)
    }

    /// Mark a slot free again.
    pub fn cancel(&mut self, time: SlotTime) -> Result<CancelOutcome, SlotError> {
        let slot = self
            .slots
            .get_mut(&time)
            .ok_or(SlotError::NotFound(time))?;

        if !slot.is_booked {
            debug!(%time, "slot not booked");
            return Ok(CancelOutcome::NotBooked);
        }

        slot.is_booked = false;
        debug!(%time, "slot cancelled");
        Ok(CancelOutcome::Cancelled)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.values()
    }

    pub fn free_slots(&self) -> Vec<SlotTime> {
        self.iter()
            .filter(|slot| !slot.is_booked)
            .map(|slot| slot.time)
            .collect()
    }

    pub fn booked_slots(&self) -> Vec<SlotTime> {
        self.iter()
            .filter(|slot| slot.is_booked)
            .map(|slot| slot.time)
            .collect()
    }

    /// Earliest free slot at or after `time`.
    pub fn next_free_at_or_after(&self, time: SlotTime) -> Option<SlotTime> {
        self.slots
            .range(time..)
            .find(|(_, slot)| !slot.is_booked)
            .map(|(key, _)| *key)
    }

    /// Closest slots strictly before and strictly after `time`, whether or not
    /// `time` itself is in the index.
    pub fn neighbors(&self, time: SlotTime) -> (Option<SlotTime>, Option<SlotTime>) {
        let prev = self
            .slots
            .range(..time)
            .next_back()
            .map(|(key, _)| *key);
        let next = self
            .slots
            .range((Bound::Excluded(time), Bound::Unbounded))
            .next()
            .map(|(key, _)| *key);
        (prev, next)
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<'a> IntoIterator for &'a SlotIndex {
    type Item = &'a TimeSlot;
    type IntoIter = std::collections::btree_map::Values<'a, SlotTime, TimeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(label: &str) -> SlotTime {
        label.parse().unwrap()
    }

    fn index(labels: &[&str]) -> SlotIndex {
        SlotIndex::with_catalog(labels.iter().map(|l| t(l))).unwrap()
    }

    #[test]
    fn lookup_ignores_insertion_order() {
        let labels = ["09:00", "09:30", "10:00", "10:30", "11:00", "13:30"];
        let orders: [[usize; 6]; 3] = [
            [0, 1, 2, 3, 4, 5],
            [5, 4, 3, 2, 1, 0],
            [2, 5, 0, 4, 1, 3],
        ];

        for order in orders {
            let mut slots = SlotIndex::new();
            for i in order {
                slots.insert(t(labels[i])).unwrap();
            }
            for label in labels {
                assert!(slots.exists(t(label)), "{label} missing for {order:?}");
            }
            for absent in ["08:59", "12:00", "23:59"] {
                assert!(!slots.exists(t(absent)));
            }
            let listed: Vec<String> = slots.iter().map(|s| s.time.to_string()).collect();
            assert_eq!(listed, labels);
        }
    }

    #[test]
    fn book_and_cancel_state_machine() {
        let mut slots = index(&["10:00"]);
        let ten = t("10:00");

        assert_eq!(slots.is_booked(ten), Some(false));
        assert_eq!(slots.book(ten), Ok(BookOutcome::Booked));
        assert_eq!(slots.is_booked(ten), Some(true));
        assert_eq!(slots.book(ten), Ok(BookOutcome::AlreadyBooked));
        assert_eq!(slots.is_booked(ten), Some(true));
        assert_eq!(slots.cancel(ten), Ok(CancelOutcome::Cancelled));
        assert_eq!(slots.is_booked(ten), Some(false));
        assert_eq!(slots.cancel(ten), Ok(CancelOutcome::NotBooked));
        assert_eq!(slots.is_booked(ten), Some(false));
    }

    #[test]
    fn unknown_slot_is_not_found() {
        let mut slots = index(&["09:00", "10:00"]);
        let late = t("23:59");

        assert_eq!(slots.book(late), Err(SlotError::NotFound(late)));
        assert_eq!(slots.cancel(late), Err(SlotError::NotFound(late)));
        assert_eq!(slots.len(), 2);
        assert!(slots.booked_slots().is_empty());
        assert_eq!(
            SlotError::NotFound(late).to_string(),
            "Time slot 23:59 does not exist."
        );
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut slots = index(&["10:00"]);
        slots.book(t("10:00")).unwrap();

        assert_eq!(
            slots.insert(t("10:00")),
            Err(SlotError::Duplicate(t("10:00")))
        );
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.is_booked(t("10:00")), Some(true));
        assert!(SlotIndex::with_catalog([t("09:00"), t("09:00")]).is_err());
    }

    #[test]
    fn neighbor_queries() {
        let mut slots = index(&["09:00", "10:00", "11:00", "12:00"]);
        slots.book(t("10:00")).unwrap();
        slots.book(t("11:00")).unwrap();

        assert_eq!(slots.next_free_at_or_after(t("09:00")), Some(t("09:00")));
        assert_eq!(slots.next_free_at_or_after(t("09:30")), Some(t("12:00")));
        assert_eq!(slots.next_free_at_or_after(t("12:30")), None);
        assert_eq!(slots.neighbors(t("10:00")), (Some(t("09:00")), Some(t("11:00"))));
        assert_eq!(slots.neighbors(t("08:00")), (None, Some(t("09:00"))));
        assert_eq!(slots.neighbors(t("12:00")), (Some(t("11:00")), None));
        assert_eq!(slots.free_slots(), vec![t("09:00"), t("12:00")]);
        assert_eq!(slots.booked_slots(), vec![t("10:00"), t("11:00")]);
    }

    #[test]
    fn clear_releases_everything() {
        let mut slots = index(&["09:00", "10:00"]);
        slots.clear();
        assert!(slots.is_empty());
        assert!(!slots.exists(t("09:00")));
    }
}
