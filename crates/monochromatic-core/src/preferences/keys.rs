//! Catalog of preference keys with their types and defaults.

use std::fmt;
use std::str::FromStr;

use super::PreferenceValue;
use crate::allowance::DEFAULT_LOW_BATTERY_THRESHOLD;
use crate::error::{ConfigError, ValidationError};
use crate::time_of_day::MinuteOfDay;

/// Value type stored under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKind {
    Bool,
    /// Minutes after midnight, `0..=1439`.
    Minute,
    /// Percentage, `0..=100`.
    Percent,
}

/// Every preference the accessor reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Enabled,
    AlwaysOn,
    DisableWithScreenOff,
    EnableWithTime,
    EnableTime,
    DisableTime,
    EnableWithLowBattery,
    LowBatteryAmount,
    NotificationDialogSeen,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 9] = [
        PreferenceKey::Enabled,
        PreferenceKey::AlwaysOn,
        PreferenceKey::DisableWithScreenOff,
        PreferenceKey::EnableWithTime,
        PreferenceKey::EnableTime,
        PreferenceKey::DisableTime,
        PreferenceKey::EnableWithLowBattery,
        PreferenceKey::LowBatteryAmount,
        PreferenceKey::NotificationDialogSeen,
    ];

    /// Stable key used in the backing store.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Enabled => "monochromatic_enabled",
            PreferenceKey::AlwaysOn => "always_on",
            PreferenceKey::DisableWithScreenOff => "disable_with_screen_off",
            PreferenceKey::EnableWithTime => "enable_with_time",
            PreferenceKey::EnableTime => "enable_time",
            PreferenceKey::DisableTime => "disable_time",
            PreferenceKey::EnableWithLowBattery => "enable_with_low_battery",
            PreferenceKey::LowBatteryAmount => "enable_with_low_battery_amount",
            PreferenceKey::NotificationDialogSeen => "show_notification_dialog",
        }
    }

    pub fn kind(&self) -> PreferenceKind {
        match self {
            PreferenceKey::EnableTime | PreferenceKey::DisableTime => PreferenceKind::Minute,
            PreferenceKey::LowBatteryAmount => PreferenceKind::Percent,
            _ => PreferenceKind::Bool,
        }
    }

    pub fn default_value(&self) -> PreferenceValue {
        match self.kind() {
            PreferenceKind::Bool => PreferenceValue::Bool(false),
            PreferenceKind::Minute => PreferenceValue::Int(0),
            PreferenceKind::Percent => PreferenceValue::Int(i64::from(DEFAULT_LOW_BATTERY_THRESHOLD)),
        }
    }

    /// Check that `value` has the right type and range for this key.
    pub fn validate(&self, value: PreferenceValue) -> Result<PreferenceValue, ValidationError> {
        match (self.kind(), value) {
            (PreferenceKind::Bool, PreferenceValue::Bool(_)) => Ok(value),
            (PreferenceKind::Minute, PreferenceValue::Int(n)) => {
                MinuteOfDay::new(n).map(|_| value)
            }
            (PreferenceKind::Percent, PreferenceValue::Int(n)) => {
                if (0..=100).contains(&n) {
                    Ok(value)
                } else {
                    Err(ValidationError::PercentOutOfRange(n))
                }
            }
            (kind, other) => Err(ValidationError::InvalidValue {
                field: self.as_str().to_string(),
                message: format!("expected {kind:?}, got {other}"),
            }),
        }
    }

    /// Parse a user-supplied string into a value for this key.
    ///
    /// Minute keys accept either `HH:MM` or a raw minute count.
    pub fn parse_value(&self, raw: &str) -> Result<PreferenceValue, ValidationError> {
        let raw = raw.trim();
        let invalid = |message: &str| ValidationError::InvalidValue {
            field: self.as_str().to_string(),
            message: message.to_string(),
        };
        let value = match self.kind() {
            PreferenceKind::Bool => PreferenceValue::Bool(
                raw.parse::<bool>()
                    .map_err(|_| invalid("expected true or false"))?,
            ),
            PreferenceKind::Minute if raw.contains(':') => {
                PreferenceValue::Int(i64::from(raw.parse::<MinuteOfDay>()?.minutes()))
            }
            PreferenceKind::Minute | PreferenceKind::Percent => PreferenceValue::Int(
                raw.parse::<i64>().map_err(|_| invalid("expected an integer"))?,
            ),
        };
        self.validate(value)
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
