//! Storage layer
//!
//! The document and preferences only ever see the [`PersistenceStore`]
//! trait: a flat map of string keys to string values.
//!
//! ## Implementations
//!
//! - [`MemoryStore`]: in-process map, used by tests and throwaway sessions
//! - [`FileStore`]: JSON object on disk, rewritten atomically on every set

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key/value durable storage
///
/// Access is synchronous. Implementations must be shareable across the
/// tasks that perform debounced saves.
pub trait PersistenceStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
