//! File-backed store
//!
//! Keeps every key in a single JSON object on disk. Each `set` rewrites the
//! whole file using an atomic write (write to temp file, then rename), so a
//! crash mid-save never leaves a half-written store behind.
//!
//! Storage location: `~/.local/share/freewrite/store.json` (configurable via
//! `Config`)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{PersistenceStore, StorageError, StorageResult};
use crate::config::Config;

/// Store persisted as a JSON object of string values
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store at the given file path
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store at the configured location
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size of the backing file in bytes (0 when missing)
    pub fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".to_string()))?;

        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let bytes = serde_json::to_vec_pretty(&values)?;
        atomic_write(&self.path, &bytes)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store.json"));

        assert!(!store.exists());
        assert_eq!(store.get("document_content").unwrap(), None);
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store.json"));

        store.set("document_content", "first draft").unwrap();
        assert!(store.exists());
        assert_eq!(
            store.get("document_content").unwrap().as_deref(),
            Some("first draft")
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store.json"));

        store.set("document_content", "text").unwrap();
        store.set("font_size", "24").unwrap();
        store.set("document_content", "").unwrap();

        assert_eq!(store.get("document_content").unwrap().as_deref(), Some(""));
        assert_eq!(store.get("font_size").unwrap().as_deref(), Some("24"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        FileStore::new(&path)
            .set("document_content", "keep me\nacross restarts")
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("document_content").unwrap().as_deref(),
            Some("keep me\nacross restarts")
        );
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("document_content").unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));

        // A corrupt store is never silently overwritten
        assert!(store.set("document_content", "x").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("store.json");

        atomic_write(&nested_path, b"{}").unwrap();

        assert!(nested_path.exists());
        assert!(!nested_path.with_extension("tmp").exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "{}");
    }
}
