//! Exported snapshots
//!
//! An export is the current content as plain UTF-8 bytes plus a file name
//! derived from the export time, e.g. `freewrite-1718000000.123456.txt`.
//! Presenting a "save as" dialog is up to the caller; [`ExportFile::write_to_dir`]
//! covers the common case of dropping the file into a directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::storage::file::atomic_write;
use crate::storage::StorageResult;

/// File name prefix for exported snapshots
pub const EXPORT_PREFIX: &str = "freewrite-";

/// A plain-text snapshot ready to be saved somewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Build an export of `content` taken at `at`
    ///
    /// The name carries the Unix timestamp with microseconds, so two exports
    /// in the same second still get distinct names.
    pub fn snapshot(content: &str, at: DateTime<Utc>) -> Self {
        Self {
            file_name: export_file_name(at),
            bytes: content.as_bytes().to_vec(),
        }
    }

    /// Write the snapshot into `dir`, returning the full path
    pub fn write_to_dir(&self, dir: &Path) -> StorageResult<PathBuf> {
        let path = dir.join(&self.file_name);
        atomic_write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `freewrite-<unix seconds>.<microseconds>.txt`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!(
        "{}{}.{:06}.txt",
        EXPORT_PREFIX,
        at.timestamp(),
        at.timestamp_subsec_micros()
    )
}
