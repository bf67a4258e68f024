//! File-backed store: a flat TOML table at `<data_dir>/preferences.toml`.
//!
//! The file is read on every lookup so edits from other processes are picked
//! up. Entries that are neither booleans nor integers are ignored on read and
//! left untouched on write. A file that cannot be parsed reads as empty but is
//! never overwritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{data_dir, ChangeListener, Listeners, PreferenceStore, PreferenceValue};
use crate::error::{ConfigError, Result};

const FILE_NAME: &str = "preferences.toml";

#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    listeners: Listeners,
}

impl TomlStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            listeners: Listeners::default(),
        }
    }

    /// Store at the default location inside [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every readable entry in the file. Never fails.
    pub fn entries(&self) -> BTreeMap<String, PreferenceValue> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                log::warn!("cannot read {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };

        let table: toml::Table = match toml::from_str(&content) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("ignoring malformed {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };

        table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::Boolean(b) => Some((key, PreferenceValue::Bool(b))),
                toml::Value::Integer(n) => Some((key, PreferenceValue::Int(n))),
                other => {
                    log::warn!("ignoring preference '{key}' of type {}", other.type_str());
                    None
                }
            })
            .collect()
    }

    /// Table to build a write on. Unlike [`entries`](Self::entries) this
    /// refuses to proceed when an existing file cannot be read or parsed, and
    /// keeps entries of every type.
    fn table_for_write(&self) -> Result<toml::Table> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(save_failed(format!("existing file unreadable: {e}")).into()),
        };
        toml::from_str::<toml::Table>(&content)
            .map_err(|e| save_failed(format!("existing file malformed: {e}")).into())
    }

    fn save(&self, table: &toml::Table) -> Result<()> {
        let content = toml::to_string_pretty(table)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl PreferenceStore for TomlStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.entries().remove(key)
    }

    fn set(&self, key: &str, value: PreferenceValue) -> Result<()> {
        {
            let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
            let mut table = self.table_for_write()?;
            let stored = match value {
                PreferenceValue::Bool(b) => toml::Value::Boolean(b),
                PreferenceValue::Int(n) => toml::Value::Integer(n),
            };
            table.insert(key.to_string(), stored);
            self.save(&table)?;
        }
        log::debug!("preference '{key}' set to {value}");
        self.listeners.notify(key);
        Ok(())
    }

    fn on_change(&self, listener: ChangeListener) {
        self.listeners.add(listener);
    }
}
