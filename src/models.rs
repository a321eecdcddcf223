/// Data models for the appointment book.
///
/// This module defines the values stored by the two indexes:
/// - SlotTime: validated "HH:MM" key
/// - TimeSlot: one bookable slot and its booked/free state
/// - Patient: a registry entry holding a name and appointment time
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TimeParseError;

/// A time-of-day label in zero-padded 24-hour `HH:MM` form.
///
/// Ordering is chronological, which matches lexicographic order of the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Build a label from hour and minute.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeParseError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(SlotTime)
            .ok_or_else(|| TimeParseError::Range(format!("{:02}:{:02}", hour, minute)))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for SlotTime {
    type Err = TimeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !well_formed {
            return Err(TimeParseError::Format(value.to_string()));
        }

        NaiveTime::parse_from_str(value, "%H:%M")
            .map(SlotTime)
            .map_err(|_| TimeParseError::Range(value.to_string()))
    }
}

impl TryFrom<String> for SlotTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// One bookable interval in the day's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub time: SlotTime,
    pub is_booked: bool,
}

impl TimeSlot {
    /// A fresh slot starts free.
    pub fn new(time: SlotTime) -> Self {
        TimeSlot {
            time,
            is_booked: false,
        }
    }
}

/// Represents a patient's current appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub patient_id: Uuid,
    pub name: String,
    pub appointment_time: SlotTime,
}

impl Patient {
    pub fn new(name: String, appointment_time: SlotTime) -> Self {
        Patient {
            patient_id: Uuid::new_v4(),
            name,
            appointment_time,
        }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Appointment Time: {}",
            self.name, self.appointment_time
        )
    }
}
