use std::path::PathBuf;

use thiserror::Error;

use crate::models::SlotTime;

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("invalid time label '{0}': expected zero-padded HH:MM")]
    Format(String),
    #[error("invalid time label '{0}': hour or minute out of range")]
    Range(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Time slot {0} does not exist.")]
    NotFound(SlotTime),
    #[error("Time slot {0} already exists.")]
    Duplicate(SlotTime),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Patient {0} not found.")]
    NotFound(String),
    #[error("Patient {0} is already registered.")]
    Duplicate(String),
    #[error("Patient name cannot be empty")]
    EmptyName,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bucket count must be positive")]
    ZeroBuckets,
    #[error("catalog lists {0} more than once")]
    DuplicateSlot(SlotTime),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Time(#[from] TimeParseError),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Time slot {0} is already booked.")]
    SlotTaken(SlotTime),
}
