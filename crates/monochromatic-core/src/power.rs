//! Battery status providers.
//!
//! A provider always yields a percentage in `0..=100`. When the underlying
//! reading is missing or nonsensical it falls back to
//! [`DEFAULT_BATTERY_PERCENT`] so the allowance rules never see an error.

use std::fs;
use std::path::{Path, PathBuf};

/// Reading substituted whenever the real battery level is unknown.
pub const DEFAULT_BATTERY_PERCENT: u8 = 50;

/// Raw level/scale pair as reported by the host (e.g. `level=45, scale=100`).
///
/// `-1` in either field means "not reported".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub level: i32,
    pub scale: i32,
}

impl BatteryReading {
    pub fn new(level: i32, scale: i32) -> Self {
        Self { level, scale }
    }

    /// Convert to a truncated percentage, or `None` when the reading is invalid.
    pub fn percent(&self) -> Option<u8> {
        if self.level < 0 || self.scale <= 0 {
            return None;
        }
        let pct = (self.level as f32 / self.scale as f32 * 100.0) as u32;
        Some(pct.min(100) as u8)
    }
}

/// Source of the current battery level.
pub trait PowerStatusProvider {
    /// Latest raw reading, `None` when the host has nothing to report.
    fn battery_reading(&self) -> Option<BatteryReading>;

    /// Battery percentage in `0..=100`, defaulting to
    /// [`DEFAULT_BATTERY_PERCENT`] on a missing or invalid reading.
    fn current_battery_percent(&self) -> u8 {
        match self.battery_reading().and_then(|r| r.percent()) {
            Some(pct) => pct,
            None => {
                log::debug!("battery level unavailable, assuming {DEFAULT_BATTERY_PERCENT}%");
                DEFAULT_BATTERY_PERCENT
            }
        }
    }
}

impl<P: PowerStatusProvider + ?Sized> PowerStatusProvider for &P {
    fn battery_reading(&self) -> Option<BatteryReading> {
        (**self).battery_reading()
    }
}

/// Provider with a fixed reading. `None` behaves like an absent battery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedPower(pub Option<u8>);

impl FixedPower {
    pub fn percent(pct: u8) -> Self {
        Self(Some(pct))
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

impl PowerStatusProvider for FixedPower {
    fn battery_reading(&self) -> Option<BatteryReading> {
        self.0.map(|pct| BatteryReading::new(i32::from(pct), 100))
    }
}

/// Reads `capacity` from the first battery under `/sys/class/power_supply`.
#[derive(Debug, Clone)]
pub struct SysfsPower {
    root: PathBuf,
}

impl Default for SysfsPower {
    fn default() -> Self {
        Self::new("/sys/class/power_supply")
    }
}

impl SysfsPower {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn is_battery(dir: &Path) -> bool {
        fs::read_to_string(dir.join("type"))
            .map(|t| t.trim().eq_ignore_ascii_case("battery"))
            .unwrap_or(false)
    }
}

impl PowerStatusProvider for SysfsPower {
    fn battery_reading(&self) -> Option<BatteryReading> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cannot read {}: {e}", self.root.display());
                return None;
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| Self::is_battery(p))
            .collect();
        dirs.sort();

        let dir = dirs.first()?;
        let raw = fs::read_to_string(dir.join("capacity")).ok()?;
        let level = raw.trim().parse::<i32>().unwrap_or(-1);
        Some(BatteryReading::new(level, 100))
    }
}
