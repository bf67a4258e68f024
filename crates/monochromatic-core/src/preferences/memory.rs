use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{ChangeListener, Listeners, PreferenceStore, PreferenceValue};
use crate::error::Result;

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, PreferenceValue>>,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored entry.
    pub fn entries(&self) -> BTreeMap<String, PreferenceValue> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    fn set(&self, key: &str, value: PreferenceValue) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        self.listeners.notify(key);
        Ok(())
    }

    fn on_change(&self, listener: ChangeListener) {
        self.listeners.add(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set_bool("always_on", true).unwrap();
        store.set_int("enable_time", 1320).unwrap();
        assert!(store.get_bool("always_on", false));
        assert_eq!(store.get_int("enable_time", 0), 1320);
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn listeners_see_every_write() {
        let store = MemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on_change(Box::new(move |key: &str| sink.lock().unwrap().push(key.to_string())));

        store.set_bool("always_on", true).unwrap();
        store.set_int("disable_time", 360).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["always_on", "disable_time"]);
    }

    #[test]
    fn listener_may_write_from_callback() {
        let store = Arc::new(MemoryStore::new());
        let inner = Arc::clone(&store);
        store.on_change(Box::new(move |key: &str| {
            if key == "monochromatic_enabled" {
                inner.set_bool("show_notification_dialog", true).unwrap();
            }
        }));

        let (tx, rx) = std::sync::mpsc::channel();
        let writer = Arc::clone(&store);
        std::thread::spawn(move || {
            writer.set_bool("monochromatic_enabled", true).unwrap();
            tx.send(()).unwrap();
        });

        rx.recv_timeout(std::time::Duration::from_secs(3))
            .expect("write from inside a listener did not complete");
        assert!(store.get_bool("show_notification_dialog", false));
    }
}
