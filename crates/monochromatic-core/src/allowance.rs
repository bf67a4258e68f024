//! Allowance rules: decides whether the filter may be active right now.
//!
//! The decision is `always_on || time window matches || battery is low`.
//! Everything here is a pure function of its inputs; callers read a fresh
//! [`AllowanceConfig`] from the preference store for every query.
//!
//! Both time-window boundaries are exclusive: with a window of 22:00-06:00
//! neither 22:00 nor 06:00 itself is allowed.

use serde::{Deserialize, Serialize};

use crate::power::DEFAULT_BATTERY_PERCENT;
use crate::time_of_day::MinuteOfDay;

/// Default low battery threshold, in percent.
pub const DEFAULT_LOW_BATTERY_THRESHOLD: u8 = 15;

/// Inputs to the allowance rules, as stored in preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceConfig {
    pub always_on: bool,
    pub time_window_enabled: bool,
    pub enable_minute: MinuteOfDay,
    pub disable_minute: MinuteOfDay,
    pub low_battery_enabled: bool,
    pub low_battery_threshold: u8,
}

impl Default for AllowanceConfig {
    fn default() -> Self {
        Self {
            always_on: false,
            time_window_enabled: false,
            enable_minute: MinuteOfDay::MIDNIGHT,
            disable_minute: MinuteOfDay::MIDNIGHT,
            low_battery_enabled: false,
            low_battery_threshold: DEFAULT_LOW_BATTERY_THRESHOLD,
        }
    }
}

impl AllowanceConfig {
    /// True when the configured window spans midnight.
    pub fn window_wraps(&self) -> bool {
        self.disable_minute < self.enable_minute
    }
}

/// Outcome of an evaluation with the rules that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub always_on: bool,
    pub time_window: bool,
    pub low_battery: bool,
    /// Battery percentage the low battery rule was checked against.
    pub battery_percent: u8,
}

impl Allowance {
    pub fn is_allowed(&self) -> bool {
        self.always_on || self.time_window || self.low_battery
    }

    /// Names of the rules that matched, in evaluation order.
    pub fn reasons(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if self.always_on {
            reasons.push("always_on");
        }
        if self.time_window {
            reasons.push("time_window");
        }
        if self.low_battery {
            reasons.push("low_battery");
        }
        reasons
    }
}

/// Stateless evaluator for the allowance rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowanceEvaluator;

impl AllowanceEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Whether the filter may be active at `now` with the given battery level.
    ///
    /// An unknown battery level is treated as [`DEFAULT_BATTERY_PERCENT`].
    pub fn is_allowed(
        &self,
        now: MinuteOfDay,
        battery_percent: Option<u8>,
        config: &AllowanceConfig,
    ) -> bool {
        config.always_on
            || self.is_time_allowed(now, config)
            || self.is_battery_allowed(battery_percent, config)
    }

    /// Same decision as [`is_allowed`](Self::is_allowed), with every rule
    /// evaluated so the caller can see which ones matched.
    pub fn evaluate(
        &self,
        now: MinuteOfDay,
        battery_percent: Option<u8>,
        config: &AllowanceConfig,
    ) -> Allowance {
        let allowance = Allowance {
            always_on: config.always_on,
            time_window: self.is_time_allowed(now, config),
            low_battery: self.is_battery_allowed(battery_percent, config),
            battery_percent: battery_percent.unwrap_or(DEFAULT_BATTERY_PERCENT),
        };
        log::debug!(
            "allowance at {now} (battery {}%): {} {:?}",
            allowance.battery_percent,
            allowance.is_allowed(),
            allowance.reasons()
        );
        allowance
    }

    /// Time window rule. Boundaries are exclusive on both ends.
    pub fn is_time_allowed(&self, now: MinuteOfDay, config: &AllowanceConfig) -> bool {
        if !config.time_window_enabled {
            return false;
        }
        let enable = config.enable_minute;
        let disable = config.disable_minute;
        if config.window_wraps() {
            enable < now || now < disable
        } else {
            enable < now && now < disable
        }
    }

    /// Low battery rule. Inclusive of the threshold.
    pub fn is_battery_allowed(&self, battery_percent: Option<u8>, config: &AllowanceConfig) -> bool {
        if !config.low_battery_enabled {
            return false;
        }
        battery_percent.unwrap_or(DEFAULT_BATTERY_PERCENT) <= config.low_battery_threshold
    }
}
