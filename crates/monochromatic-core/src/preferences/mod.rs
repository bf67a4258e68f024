//! Key-value preference storage.
//!
//! Reads never fail: a missing, mistyped or unreadable value resolves to the
//! caller's default. Writes return [`Result`](crate::error::Result) so a
//! file-backed store can report I/O failures.

pub mod keys;
mod memory;
mod toml_store;

pub use keys::{PreferenceKey, PreferenceKind};
pub use memory::MemoryStore;
pub use toml_store::TomlStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{ConfigError, Result};

/// Callback invoked with the key that changed.
pub type ChangeListener = Box<dyn Fn(&str) + Send + Sync>;

/// A stored preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
}

impl PreferenceValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceValue::Bool(b) => Some(*b),
            PreferenceValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PreferenceValue::Int(n) => Some(*n),
            PreferenceValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Bool(b) => write!(f, "{b}"),
            PreferenceValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Typed key-value store backing the settings.
pub trait PreferenceStore {
    /// Raw lookup, `None` when the key is absent.
    fn get(&self, key: &str) -> Option<PreferenceValue>;

    /// Store `value` under `key` and notify listeners.
    fn set(&self, key: &str, value: PreferenceValue) -> Result<()>;

    /// Register a listener called after every successful write.
    fn on_change(&self, listener: ChangeListener);

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PreferenceValue::Bool(b)) => b,
            Some(other) => {
                log::warn!("preference '{key}' holds {other}, expected a bool; using {default}");
                default
            }
            None => default,
        }
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(PreferenceValue::Int(n)) => n,
            Some(other) => {
                log::warn!("preference '{key}' holds {other}, expected an int; using {default}");
                default
            }
            None => default,
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, PreferenceValue::Bool(value))
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.set(key, PreferenceValue::Int(value))
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: PreferenceValue) -> Result<()> {
        (**self).set(key, value)
    }

    fn on_change(&self, listener: ChangeListener) {
        (**self).on_change(listener)
    }
}

/// Registered change listeners.
#[derive(Default)]
pub(crate) struct Listeners(Mutex<Vec<Arc<dyn Fn(&str) + Send + Sync>>>);

impl Listeners {
    pub(crate) fn add(&self, listener: ChangeListener) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::from(listener));
    }

    /// Callbacks run without the registry lock held, so they may write
    /// preferences or register listeners themselves.
    pub(crate) fn notify(&self, key: &str) {
        let listeners: Vec<_> = self
            .0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for listener in &listeners {
            listener(key);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.lock().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("Listeners").field("count", &count).finish()
    }
}

/// Returns `~/.config/monochromatic[-dev]/` based on MONOCHROMATIC_ENV.
///
/// Set MONOCHROMATIC_ENV=dev to use the development data directory, or
/// MONOCHROMATIC_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MONOCHROMATIC_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
                .unwrap_or_else(|| PathBuf::from("."));

            let env =
                std::env::var("MONOCHROMATIC_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("monochromatic-dev")
            } else {
                base_dir.join("monochromatic")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
