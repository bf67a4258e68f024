//! Typed accessor over a [`PreferenceStore`].
//!
//! Every getter reads the store afresh; nothing is cached. Out-of-range
//! stored values are treated as malformed and resolve to the key's default.

use serde::{Deserialize, Serialize};

use crate::allowance::{Allowance, AllowanceConfig, AllowanceEvaluator, DEFAULT_LOW_BATTERY_THRESHOLD};
use crate::capability::CapabilityCheck;
use crate::error::{Result, ValidationError};
use crate::power::PowerStatusProvider;
use crate::preferences::{ChangeListener, PreferenceKey, PreferenceStore, PreferenceValue};
use crate::time_of_day::MinuteOfDay;

/// Every stored setting, resolved with defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub enabled: bool,
    pub always_on: bool,
    pub disable_on_screen_off: bool,
    pub enable_at_time: bool,
    pub enable_time: MinuteOfDay,
    pub disable_time: MinuteOfDay,
    pub enable_at_low_battery: bool,
    pub low_battery_level: u8,
    pub notification_dialog_seen: bool,
}

pub struct Settings<S, C> {
    store: S,
    capability: C,
    evaluator: AllowanceEvaluator,
}

impl<S: PreferenceStore, C: CapabilityCheck> Settings<S, C> {
    pub fn new(store: S, capability: C) -> Self {
        Self {
            store,
            capability,
            evaluator: AllowanceEvaluator::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn get_bool(&self, key: PreferenceKey) -> bool {
        let default = key.default_value().as_bool().unwrap_or(false);
        self.store.get_bool(key.as_str(), default)
    }

    fn set_bool(&self, key: PreferenceKey, value: bool) -> Result<()> {
        self.store.set_bool(key.as_str(), value)
    }

    fn get_minute(&self, key: PreferenceKey) -> MinuteOfDay {
        let raw = self.store.get_int(key.as_str(), 0);
        MinuteOfDay::new(raw).unwrap_or_else(|e| {
            log::warn!("preference '{key}': {e}; using 00:00");
            MinuteOfDay::MIDNIGHT
        })
    }

    /// Write a value after checking it against the key catalog.
    pub fn set_value(&self, key: PreferenceKey, value: PreferenceValue) -> Result<()> {
        let value = key.validate(value)?;
        self.store.set(key.as_str(), value)
    }

    /// Current value for `key`, with malformed entries replaced by the default.
    pub fn value(&self, key: PreferenceKey) -> PreferenceValue {
        match key {
            PreferenceKey::EnableTime | PreferenceKey::DisableTime => {
                PreferenceValue::Int(i64::from(self.get_minute(key).minutes()))
            }
            PreferenceKey::LowBatteryAmount => {
                PreferenceValue::Int(i64::from(self.low_battery_level()))
            }
            _ => PreferenceValue::Bool(self.get_bool(key)),
        }
    }

    pub fn register_change_listener(&self, listener: ChangeListener) {
        self.store.on_change(listener);
    }

    /// Master switch, only effective when the host capability is granted.
    pub fn is_enabled(&self) -> bool {
        self.get_bool(PreferenceKey::Enabled) && self.capability.has_required_permission()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.set_bool(PreferenceKey::Enabled, enabled)
    }

    pub fn is_always_on(&self) -> bool {
        self.get_bool(PreferenceKey::AlwaysOn)
    }

    pub fn set_always_on(&self, value: bool) -> Result<()> {
        self.set_bool(PreferenceKey::AlwaysOn, value)
    }

    pub fn should_disable_on_screen_off(&self) -> bool {
        self.get_bool(PreferenceKey::DisableWithScreenOff)
    }

    pub fn set_disable_on_screen_off(&self, value: bool) -> Result<()> {
        self.set_bool(PreferenceKey::DisableWithScreenOff, value)
    }

    pub fn should_enable_at_time(&self) -> bool {
        self.get_bool(PreferenceKey::EnableWithTime)
    }

    pub fn set_enable_at_time(&self, value: bool) -> Result<()> {
        self.set_bool(PreferenceKey::EnableWithTime, value)
    }

    pub fn enable_time(&self) -> MinuteOfDay {
        self.get_minute(PreferenceKey::EnableTime)
    }

    pub fn set_enable_time(&self, time: MinuteOfDay) -> Result<()> {
        self.store
            .set_int(PreferenceKey::EnableTime.as_str(), i64::from(time.minutes()))
    }

    pub fn disable_time(&self) -> MinuteOfDay {
        self.get_minute(PreferenceKey::DisableTime)
    }

    pub fn set_disable_time(&self, time: MinuteOfDay) -> Result<()> {
        self.store
            .set_int(PreferenceKey::DisableTime.as_str(), i64::from(time.minutes()))
    }

    pub fn should_enable_at_low_battery(&self) -> bool {
        self.get_bool(PreferenceKey::EnableWithLowBattery)
    }

    pub fn set_enable_at_low_battery(&self, value: bool) -> Result<()> {
        self.set_bool(PreferenceKey::EnableWithLowBattery, value)
    }

    pub fn low_battery_level(&self) -> u8 {
        let default = DEFAULT_LOW_BATTERY_THRESHOLD;
        let raw = self
            .store
            .get_int(PreferenceKey::LowBatteryAmount.as_str(), i64::from(default));
        match u8::try_from(raw) {
            Ok(level) if level <= 100 => level,
            _ => {
                log::warn!("low battery level {raw} out of range; using {default}");
                default
            }
        }
    }

    /// # Errors
    /// Returns [`ValidationError::PercentOutOfRange`] above 100.
    pub fn set_low_battery_level(&self, level: u8) -> Result<()> {
        if level > 100 {
            return Err(ValidationError::PercentOutOfRange(i64::from(level)).into());
        }
        self.store
            .set_int(PreferenceKey::LowBatteryAmount.as_str(), i64::from(level))
    }

    pub fn seen_notification_dialog(&self) -> bool {
        self.get_bool(PreferenceKey::NotificationDialogSeen)
    }

    pub fn set_seen_notification_dialog(&self) -> Result<()> {
        self.set_bool(PreferenceKey::NotificationDialogSeen, true)
    }

    /// Restore every key in the catalog to its default.
    pub fn reset(&self) -> Result<()> {
        for key in PreferenceKey::ALL {
            self.store.set(key.as_str(), key.default_value())?;
        }
        Ok(())
    }

    /// Inputs to the allowance rules, read fresh from the store.
    pub fn allowance_config(&self) -> AllowanceConfig {
        AllowanceConfig {
            always_on: self.is_always_on(),
            time_window_enabled: self.should_enable_at_time(),
            enable_minute: self.enable_time(),
            disable_minute: self.disable_time(),
            low_battery_enabled: self.should_enable_at_low_battery(),
            low_battery_threshold: self.low_battery_level(),
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            enabled: self.is_enabled(),
            always_on: self.is_always_on(),
            disable_on_screen_off: self.should_disable_on_screen_off(),
            enable_at_time: self.should_enable_at_time(),
            enable_time: self.enable_time(),
            disable_time: self.disable_time(),
            enable_at_low_battery: self.should_enable_at_low_battery(),
            low_battery_level: self.low_battery_level(),
            notification_dialog_seen: self.seen_notification_dialog(),
        }
    }

    /// Evaluate the allowance rules at `now` against the provider's battery level.
    pub fn evaluate_at<P: PowerStatusProvider>(&self, now: MinuteOfDay, power: &P) -> Allowance {
        let battery = power.current_battery_percent();
        self.evaluator
            .evaluate(now, Some(battery), &self.allowance_config())
    }

    pub fn is_allowed_at<P: PowerStatusProvider>(&self, now: MinuteOfDay, power: &P) -> bool {
        self.evaluate_at(now, power).is_allowed()
    }

    /// Whether the filter may be active at the current local time.
    pub fn is_allowed<P: PowerStatusProvider>(&self, power: &P) -> bool {
        self.is_allowed_at(MinuteOfDay::now(), power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::StaticCapability;
    use crate::power::FixedPower;
    use crate::preferences::MemoryStore;

    fn settings() -> Settings<MemoryStore, StaticCapability> {
        Settings::new(MemoryStore::new(), StaticCapability(true))
    }

    fn m(minutes: i64) -> MinuteOfDay {
        MinuteOfDay::new(minutes).unwrap()
    }

    #[test]
    fn defaults_from_empty_store() {
        let s = settings();
        let snap = s.snapshot();
        assert!(!snap.enabled);
        assert!(!snap.always_on);
        assert!(!snap.disable_on_screen_off);
        assert!(!snap.enable_at_time);
        assert_eq!(snap.enable_time, MinuteOfDay::MIDNIGHT);
        assert_eq!(snap.disable_time, MinuteOfDay::MIDNIGHT);
        assert!(!snap.enable_at_low_battery);
        assert_eq!(snap.low_battery_level, 15);
        assert!(!snap.notification_dialog_seen);
    }

    #[test]
    fn enabled_requires_capability() {
        let granted = settings();
        granted.set_enabled(true).unwrap();
        assert!(granted.is_enabled());

        let denied = Settings::new(MemoryStore::new(), StaticCapability(false));
        denied.set_enabled(true).unwrap();
        assert!(!denied.is_enabled());
    }

    #[test]
    fn setters_round_trip() {
        let s = settings();
        s.set_always_on(true).unwrap();
        s.set_disable_on_screen_off(true).unwrap();
        s.set_enable_at_time(true).unwrap();
        s.set_enable_time(m(1320)).unwrap();
        s.set_disable_time(m(360)).unwrap();
        s.set_enable_at_low_battery(true).unwrap();
        s.set_low_battery_level(30).unwrap();
        s.set_seen_notification_dialog().unwrap();

        assert!(s.is_always_on());
        assert!(s.should_disable_on_screen_off());
        assert!(s.should_enable_at_time());
        assert_eq!(s.enable_time(), m(1320));
        assert_eq!(s.disable_time(), m(360));
        assert!(s.should_enable_at_low_battery());
        assert_eq!(s.low_battery_level(), 30);
        assert!(s.seen_notification_dialog());
    }

    #[test]
    fn low_battery_level_rejects_over_100() {
        let s = settings();
        assert!(s.set_low_battery_level(101).is_err());
        assert_eq!(s.low_battery_level(), 15);
    }

    #[test]
    fn out_of_range_stored_values_resolve_to_defaults() {
        let s = settings();
        s.store().set_int("enable_time", 5000).unwrap();
        s.store().set_int("enable_with_low_battery_amount", -3).unwrap();
        s.store().set_bool("disable_time", true).unwrap();

        assert_eq!(s.enable_time(), MinuteOfDay::MIDNIGHT);
        assert_eq!(s.disable_time(), MinuteOfDay::MIDNIGHT);
        assert_eq!(s.low_battery_level(), 15);
    }

    #[test]
    fn set_value_validates_against_catalog() {
        let s = settings();
        s.set_value(PreferenceKey::EnableTime, PreferenceValue::Int(1320))
            .unwrap();
        assert!(s
            .set_value(PreferenceKey::EnableTime, PreferenceValue::Int(1440))
            .is_err());
        assert!(s
            .set_value(PreferenceKey::AlwaysOn, PreferenceValue::Int(1))
            .is_err());
        assert_eq!(s.value(PreferenceKey::EnableTime), PreferenceValue::Int(1320));
    }

    #[test]
    fn reset_restores_defaults() {
        let s = settings();
        s.set_always_on(true).unwrap();
        s.set_low_battery_level(80).unwrap();
        s.reset().unwrap();
        assert!(!s.is_always_on());
        assert_eq!(s.low_battery_level(), 15);
    }

    #[test]
    fn allowance_reads_fresh_values() {
        let s = settings();
        let power = FixedPower::percent(90);
        assert!(!s.is_allowed_at(m(700), &power));

        s.set_always_on(true).unwrap();
        assert!(s.is_allowed_at(m(700), &power));

        s.set_always_on(false).unwrap();
        s.set_enable_at_time(true).unwrap();
        s.set_enable_time(m(1320)).unwrap();
        s.set_disable_time(m(360)).unwrap();
        assert!(s.is_allowed_at(m(180), &power));
        assert!(!s.is_allowed_at(m(700), &power));
    }

    #[test]
    fn unknown_battery_uses_fallback_reading() {
        let s = settings();
        s.set_enable_at_low_battery(true).unwrap();
        s.set_low_battery_level(60).unwrap();
        assert!(s.is_allowed_at(m(700), &FixedPower::unknown()));
        s.set_low_battery_level(40).unwrap();
        assert!(!s.is_allowed_at(m(700), &FixedPower::unknown()));
    }

    #[test]
    fn allowance_config_mirrors_store() {
        let s = settings();
        s.set_enable_at_time(true).unwrap();
        s.set_enable_time(m(540)).unwrap();
        s.set_disable_time(m(1020)).unwrap();
        let cfg = s.allowance_config();
        assert!(cfg.time_window_enabled);
        assert_eq!(cfg.enable_minute, m(540));
        assert_eq!(cfg.disable_minute, m(1020));
        assert_eq!(cfg.low_battery_threshold, 15);
    }
}
