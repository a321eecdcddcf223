use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::SlotTime;
use crate::registry::DEFAULT_BUCKETS;

/// The day's default catalog, as (hour, minute).
pub const DEFAULT_CATALOG: [(u32, u32); 10] = [
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (12, 0),
    (13, 0),
    (13, 30),
    (14, 0),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub bucket_count: usize,
    pub catalog: Vec<SlotTime>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            bucket_count: DEFAULT_BUCKETS,
            catalog: DEFAULT_CATALOG
                .iter()
                .filter_map(|&(hour, minute)| SlotTime::from_hm(hour, minute).ok())
                .collect(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_catalog(catalog: Vec<SlotTime>) -> Self {
        SchedulerConfig {
            catalog,
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SchedulerConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_count == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        let mut seen = BTreeSet::new();
        for time in &self.catalog {
            if !seen.insert(*time) {
                return Err(ConfigError::DuplicateSlot(*time));
            }
        }
        Ok(())
    }
}
