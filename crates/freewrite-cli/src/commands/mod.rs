//! Command handlers

use std::sync::Arc;

use anyhow::anyhow;

use freewrite_core::{Config, FileStore, StorageError, WritingDocument};

pub mod compose;
pub mod config;
pub mod document;
pub mod export;
pub mod prefs;
pub mod session;
pub mod status;
pub mod timer;

/// Open the document backed by the configured store file
pub fn open_document(config: &Config) -> (Arc<FileStore>, WritingDocument) {
    let store = Arc::new(FileStore::from_config(config));
    let doc = WritingDocument::load(store.clone(), config.autosave());
    (store, doc)
}

/// Add the store's recovery suggestion, if it has one, to a failed command
pub fn with_storage_hint(err: anyhow::Error) -> anyhow::Error {
    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion);

    match hint {
        Some(hint) => anyhow!("{:#}\n{}", err, hint),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use anyhow::Context;

    #[test]
    fn test_storage_hint_is_appended() {
        let denied = StorageError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/data/store.json"),
        );
        let err = with_storage_hint(
            Err::<(), _>(denied)
                .context("Failed to save font preference")
                .unwrap_err(),
        );

        let msg = format!("{:#}", err);
        assert!(msg.starts_with("Failed to save font preference"));
        assert!(msg.ends_with("Check file and directory permissions for the data directory."));
    }

    #[test]
    fn test_errors_without_hint_are_unchanged() {
        let err = with_storage_hint(anyhow!("Not a number of minutes: soon"));
        assert_eq!(err.to_string(), "Not a number of minutes: soon");
    }
}
