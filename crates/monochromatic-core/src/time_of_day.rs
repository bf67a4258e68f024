//! Time of day expressed as minutes after midnight.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes after midnight, always in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);

    /// Create from a raw minute count, rejecting values outside `0..=1439`.
    pub fn new(minutes: i64) -> Result<Self, ValidationError> {
        if (0..i64::from(MINUTES_PER_DAY)).contains(&minutes) {
            Ok(Self(minutes as u16))
        } else {
            Err(ValidationError::MinuteOutOfRange(minutes))
        }
    }

    /// Truncate a wall-clock time to its minute.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Current local time of day.
    pub fn now() -> Self {
        Self::from_time(&chrono::Local::now())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinuteOfDay {
    type Err = ValidationError;

    /// Parses `HH:MM` (24h clock).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(|t| Self::from_time(&t))
            .map_err(|_| ValidationError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<i64> for MinuteOfDay {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinuteOfDay> for i64 {
    fn from(value: MinuteOfDay) -> Self {
        i64::from(value.0)
    }
}
