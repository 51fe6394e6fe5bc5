//! In-memory store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{PersistenceStore, StorageError, StorageResult};

/// Store backed by a `HashMap`
///
/// Keeps a count of writes so callers can check how many saves actually
/// reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Number of successful `set` calls since creation
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());

        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("document_content").unwrap(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("document_content", "hello").unwrap();
        store.set("document_content", "hello world").unwrap();

        assert_eq!(
            store.get("document_content").unwrap().as_deref(),
            Some("hello world")
        );
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_with_value_does_not_count_as_write() {
        let store = MemoryStore::with_value("font_size", "20");
        assert_eq!(store.get("font_size").unwrap().as_deref(), Some("20"));
        assert_eq!(store.write_count(), 0);
    }
}
