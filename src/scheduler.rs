/// Scheduling facade over the slot index and the patient registry.
///
/// The two structures never talk to each other. `Scheduler` owns both and
/// exposes compound operations that check every precondition before touching
/// either half, so a failed call leaves both unchanged.
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::{RegistryError, Result, ScheduleError, SlotError};
use crate::models::{Patient, SlotTime};
use crate::registry::PatientRegistry;
use crate::slot_index::SlotIndex;

/// A patient asking for a specific slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub time: SlotTime,
}

impl BookingRequest {
    pub fn new(name: impl Into<String>, time: SlotTime) -> Self {
        BookingRequest {
            name: name.into(),
            time,
        }
    }
}

/// A request that could not be honoured.
#[derive(Debug)]
pub struct BookingFailure {
    pub request: BookingRequest,
    pub reason: ScheduleError,
}

/// Result of scheduling multiple requests.
#[derive(Debug)]
pub struct BatchResult {
    pub confirmed: Vec<Patient>,
    pub failed: Vec<BookingFailure>,
    pub total_requests: usize,
}

impl BatchResult {
    /// Calculate the success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        (self.confirmed.len() as f64 / self.total_requests as f64) * 100.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    slots: SlotIndex,
    registry: PatientRegistry,
}

impl Scheduler {
    pub fn new(slots: SlotIndex, registry: PatientRegistry) -> Self {
        Scheduler { slots, registry }
    }

    /// Seed a scheduler from a validated config.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let slots = SlotIndex::with_catalog(config.catalog.iter().copied())?;
        let registry = PatientRegistry::with_buckets(config.bucket_count);
        info!(
            slots = slots.len(),
            buckets = registry.bucket_count(),
            "scheduler ready"
        );
        Ok(Scheduler::new(slots, registry))
    }

    pub fn slots(&self) -> &SlotIndex {
        &self.slots
    }

    pub fn registry(&self) -> &PatientRegistry {
        &self.registry
    }

    /// Direct access for callers that drive the slot index on its own.
    pub fn slots_mut(&mut self) -> &mut SlotIndex {
        &mut self.slots
    }

    /// Direct access for callers that drive the registry on its own.
    pub fn registry_mut(&mut self) -> &mut PatientRegistry {
        &mut self.registry
    }

    pub fn patients(&self) -> Vec<(String, SlotTime)> {
        self.registry.enumerate()
    }

    pub fn free_slots(&self) -> Vec<SlotTime> {
        self.slots.free_slots()
    }

    pub fn booked_slots(&self) -> Vec<SlotTime> {
        self.slots.booked_slots()
    }

    pub fn next_free_slot(&self, after: SlotTime) -> Option<SlotTime> {
        self.slots.next_free_at_or_after(after)
    }

    fn ensure_free(&self, time: SlotTime) -> Result<()> {
        match self.slots.is_booked(time) {
            None => Err(SlotError::NotFound(time).into()),
            Some(true) => Err(ScheduleError::SlotTaken(time)),
            Some(false) => Ok(()),
        }
    }

    fn ensure_registrable(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName.into());
        }
        if self.registry.contains(name) {
            return Err(RegistryError::Duplicate(name.to_string()).into());
        }
        Ok(())
    }

    /// Book `time` and register `name` against it as one step.
    pub fn book_for_patient(&mut self, name: &str, time: SlotTime) -> Result<&Patient> {
        self.ensure_free(time)?;
        self.ensure_registrable(name)?;

        self.slots.book(time)?;
        let patient = self.registry.add(name, time)?;
        info!(patient = name, %time, "appointment booked");
        Ok(patient)
    }

    /// Unregister `name` and free the slot they held.
    pub fn cancel_for_patient(&mut self, name: &str) -> Result<Patient> {
        let time = self
            .registry
            .find(name)
            .map(|patient| patient.appointment_time)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if !self.slots.exists(time) {
            return Err(SlotError::NotFound(time).into());
        }

        let patient = self.registry.remove(name)?;
        let outcome = self.slots.cancel(time)?;
        info!(patient = name, %time, ?outcome, "appointment cancelled");
        Ok(patient)
    }

    /// Move `name` to `new_time`. The old slot is freed only once the new one
    /// is booked.
    pub fn reschedule(&mut self, name: &str, new_time: SlotTime) -> Result<&Patient> {
        let old_time = self
            .registry
            .find(name)
            .map(|patient| patient.appointment_time)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if old_time != new_time {
            self.ensure_free(new_time)?;
            self.slots.book(new_time)?;
            if self.slots.exists(old_time) {
                self.slots.cancel(old_time)?;
            }
            info!(patient = name, from = %old_time, to = %new_time, "appointment rescheduled");
        } else {
            debug!(patient = name, %new_time, "reschedule to same slot");
        }

        Ok(self.registry.reassign(name, new_time)?)
    }

    /// Book each request in submission order, collecting failures.
    pub fn schedule_batch(&mut self, requests: Vec<BookingRequest>) -> BatchResult {
        let total_requests = requests.len();
        let mut confirmed = Vec::new();
        let mut failed = Vec::new();

        for request in requests {
            match self.book_for_patient(&request.name, request.time) {
                Ok(patient) => confirmed.push(patient.clone()),
                Err(reason) => {
                    debug!(patient = %request.name, time = %request.time, %reason, "request failed");
                    failed.push(BookingFailure { request, reason });
                }
            }
        }

        BatchResult {
            confirmed,
            failed,
            total_requests,
        }
    }

    /// Release every slot and patient.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.registry.clear();
    }
}
