use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key/value storage scoped to one browser session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String) -> Result<(), String>;
    fn remove_item(&self, key: &str);
}

/// Process-local session storage. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemorySessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.is_empty())
            .unwrap_or(true)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}
