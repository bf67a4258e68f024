//! # Monochromatic Core Library
//!
//! Settings and policy logic for a screen greyscale filter. The host
//! application decides when to apply the filter by asking whether it is
//! currently *allowed*; this crate answers that question from stored
//! preferences, the time of day and the battery level.
//!
//! ## Architecture
//!
//! - **Allowance rules**: a pure evaluator combining the always-on switch, a
//!   time window that may wrap midnight, and a low battery threshold
//! - **Preferences**: a key-value store trait with in-memory and TOML file
//!   implementations; reads never fail and resolve to defaults
//! - **Power status**: battery providers with a fixed 50% fallback
//!
//! ## Key Components
//!
//! - [`AllowanceEvaluator`]: decision engine
//! - [`Settings`]: typed accessor over a [`PreferenceStore`]
//! - [`PowerStatusProvider`]: battery level source
//! - [`CapabilityCheck`]: host permission gate for the master switch

pub mod allowance;
pub mod capability;
pub mod error;
pub mod power;
pub mod preferences;
pub mod settings;
pub mod time_of_day;

pub use allowance::{Allowance, AllowanceConfig, AllowanceEvaluator, DEFAULT_LOW_BATTERY_THRESHOLD};
pub use capability::{CapabilityCheck, StaticCapability};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use power::{BatteryReading, FixedPower, PowerStatusProvider, SysfsPower, DEFAULT_BATTERY_PERCENT};
pub use preferences::{
    data_dir, ChangeListener, MemoryStore, PreferenceKey, PreferenceKind, PreferenceStore,
    PreferenceValue, TomlStore,
};
pub use settings::{Settings, SettingsSnapshot};
pub use time_of_day::MinuteOfDay;
