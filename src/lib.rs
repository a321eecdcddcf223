//! In-memory appointment book for a single day.
//!
//! A [`SlotIndex`] keeps the day's time slots in chronological order with a
//! booked/free flag each. A [`PatientRegistry`] maps patient names to the time
//! they hold. The two are independent; [`Scheduler`] owns both and keeps them
//! in step for callers that want that.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod slot_index;

pub use config::SchedulerConfig;
pub use error::{ConfigError, RegistryError, Result, ScheduleError, SlotError, TimeParseError};
pub use models::{Patient, SlotTime, TimeSlot};
pub use registry::PatientRegistry;
pub use scheduler::{BatchResult, BookingFailure, BookingRequest, Scheduler};
pub use slot_index::{BookOutcome, CancelOutcome, SlotIndex};
