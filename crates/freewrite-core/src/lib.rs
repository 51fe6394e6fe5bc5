//! Freewrite Core Library
//!
//! This crate provides the core of Freewrite, a distraction-free writing
//! app: one live document that saves itself, a history of set-aside
//! entries, and a countdown timer for timed sessions.
//!
//! Front ends (the `freewrite` CLI, or any UI) own presentation and call
//! into the types here.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = Arc::new(FileStore::from_config(&config));
//! let doc = WritingDocument::load(store, config.autosave());
//!
//! doc.set_content("It was a dark and stormy night");  // saved after a quiet period
//! doc.create_new_entry();                             // moved into history
//! ```
//!
//! # Modules
//!
//! - `document`: live content, debounced autosave, entry history
//! - `timer`: countdown timer
//! - `storage`: key/value persistence (memory and file backed)
//! - `preferences`: font choice and size
//! - `export`: timestamped plain-text snapshots
//! - `compose`: compose-in-browser prompt and URL
//! - `config`: application configuration

pub mod compose;
pub mod config;
pub mod document;
pub mod export;
pub mod preferences;
pub mod storage;
pub mod timer;

pub use config::Config;
pub use document::{AutosaveSettings, DocumentError, DocumentSnapshot, WritingDocument};
pub use export::ExportFile;
pub use preferences::{FontOption, Preferences, PreferencesError};
pub use storage::{FileStore, MemoryStore, PersistenceStore, StorageError, StorageResult};
pub use timer::{CountdownTimer, Tick, TimerError};
