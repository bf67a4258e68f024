//! Core error types for monochromatic-core.
//!
//! Reads never fail (they resolve to defaults), so this hierarchy only
//! covers the fallible surfaces: persisting preferences, resolving the data
//! directory and validating values before they are written.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for monochromatic-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Preference storage errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Preference storage errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save preferences
    #[error("Failed to save preferences to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key is not part of the preference catalog
    #[error("Unknown preference key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Minute of day outside [0, 1439]
    #[error("Minute of day {0} out of range (expected 0..=1439)")]
    MinuteOutOfRange(i64),

    /// Battery percentage outside [0, 100]
    #[error("Battery percentage {0} out of range (expected 0..=100)")]
    PercentOutOfRange(i64),

    /// Unparseable time of day
    #[error("Invalid time of day '{0}' (expected HH:MM)")]
    InvalidTime(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
