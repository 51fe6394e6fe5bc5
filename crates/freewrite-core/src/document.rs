//! The writing document
//!
//! `WritingDocument` owns the live text, persists it with a debounced
//! autosave, and keeps the in-memory list of entries the writer has set
//! aside with "new entry".
//!
//! ## Autosave
//!
//! Every edit cancels the pending save (if it has not fired yet) and
//! schedules a fresh one after [`AutosaveSettings::delay`]. When the delay
//! elapses the content present at that moment is written to the store
//! under [`CONTENT_KEY`], and `is_saving` stays on for at least
//! [`AutosaveSettings::min_visible`] so the indicator never just flickers.
//!
//! A save that has fired is never cancelled, and writes for one document
//! never overlap. Write failures are logged and recorded in
//! [`DocumentSnapshot::last_save_failed`], never returned.
//!
//! ## History
//!
//! History is most-recent-first and lives only in memory. Only `content`
//! survives a restart.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::export::ExportFile;
use crate::storage::PersistenceStore;

/// Store key holding the live document content
pub const CONTENT_KEY: &str = "document_content";

/// Errors that can occur during document operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No history entry at index {index} (history has {len} entries)")]
    EntryOutOfRange { index: usize, len: usize },
}

/// Timing of the debounced autosave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveSettings {
    /// Quiet period after the last edit before a save fires
    pub delay: Duration,
    /// Minimum time `is_saving` stays true once a save starts
    pub min_visible: Duration,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(crate::config::DEFAULT_AUTOSAVE_DELAY_MS),
            min_visible: Duration::from_millis(crate::config::DEFAULT_MIN_SAVE_VISIBLE_MS),
        }
    }
}

/// Point-in-time view of the document, published to subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub content: String,
    pub is_saving: bool,
    /// Most recent entry first
    pub history: Vec<String>,
    /// The most recent write to the store failed
    pub last_save_failed: bool,
    /// What the writer can do about the last failure, when the store knows
    pub last_save_hint: Option<&'static str>,
}

/// A scheduled save that has not fired yet
struct PendingSave {
    generation: u64,
    task: JoinHandle<()>,
}

impl PendingSave {
    fn cancel(self) {
        self.task.abort();
    }
}

struct DocumentState {
    content: String,
    is_saving: bool,
    history: Vec<String>,
    last_save_failed: bool,
    last_save_hint: Option<&'static str>,
    /// At most one pending save per document
    pending: Option<PendingSave>,
    generation: u64,
}

impl DocumentState {
    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            content: self.content.clone(),
            is_saving: self.is_saving,
            history: self.history.clone(),
            last_save_failed: self.last_save_failed,
            last_save_hint: self.last_save_hint,
        }
    }
}

struct Shared {
    state: Mutex<DocumentState>,
    store: Arc<dyn PersistenceStore>,
    settings: AutosaveSettings,
    /// Held for the whole duration of a save
    save_lock: tokio::sync::Mutex<()>,
    changes: watch::Sender<DocumentSnapshot>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &DocumentState) {
        self.changes.send_replace(state.snapshot());
    }

    /// Replace the content and restart the debounce window
    fn replace_content(self: &Arc<Self>, state: &mut DocumentState, text: String) {
        state.content = text;

        if let Some(pending) = state.pending.take() {
            debug!(generation = pending.generation, "Cancelled pending autosave");
            pending.cancel();
        }

        state.generation += 1;
        let generation = state.generation;
        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(shared.settings.delay).await;
            shared.fire(generation).await;
        });
        state.pending = Some(PendingSave { generation, task });
        debug!(generation, delay = ?self.settings.delay, "Scheduled autosave");

        self.publish(state);
    }

    /// Debounce timer elapsed: save unless this timer has been superseded
    async fn fire(&self, generation: u64) {
        let content = {
            let mut state = self.lock_state();
            match &state.pending {
                Some(pending) if pending.generation == generation => {}
                _ => return,
            }
            // From here on the save can no longer be cancelled
            state.pending = None;
            state.content.clone()
        };

        self.save(content).await;
    }

    async fn save(&self, content: String) {
        let _guard = self.save_lock.lock().await;

        {
            let mut state = self.lock_state();
            state.is_saving = true;
            self.publish(&state);
        }
        let started = Instant::now();

        let outcome = match self.store.set(CONTENT_KEY, &content) {
            Ok(()) => {
                info!(bytes = content.len(), "Saved document");
                Ok(())
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Autosave failed: {}", e);
                } else {
                    error!("Autosave failed: {}", e);
                }
                Err(e.recovery_suggestion())
            }
        };

        tokio::time::sleep_until(started + self.settings.min_visible).await;

        let mut state = self.lock_state();
        state.is_saving = false;
        state.last_save_failed = outcome.is_err();
        state.last_save_hint = outcome.err().flatten();
        self.publish(&state);
    }
}

/// The live document with debounced persistence and entry history
///
/// Cloning yields another handle to the same document. Edits schedule tasks
/// on the current tokio runtime, so they must be made from within one.
#[derive(Clone)]
pub struct WritingDocument {
    shared: Arc<Shared>,
}

impl WritingDocument {
    /// Open the document, restoring content saved in a previous session
    ///
    /// A missing, empty or unreadable saved value yields an empty document.
    /// History always starts empty.
    pub fn load(store: Arc<dyn PersistenceStore>, settings: AutosaveSettings) -> Self {
        let content = match store.get(CONTENT_KEY) {
            Ok(Some(saved)) if !saved.is_empty() => {
                debug!(bytes = saved.len(), "Restored saved document");
                saved
            }
            Ok(_) => String::new(),
            Err(e) => {
                warn!("Could not read saved document, starting empty: {}", e);
                String::new()
            }
        };

        let state = DocumentState {
            content,
            is_saving: false,
            history: Vec::new(),
            last_save_failed: false,
            last_save_hint: None,
            pending: None,
            generation: 0,
        };
        let (changes, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                store,
                settings,
                save_lock: tokio::sync::Mutex::new(()),
                changes,
            }),
        }
    }

    /// Current content
    pub fn content(&self) -> String {
        self.shared.lock_state().content.clone()
    }

    /// Whether a save is in flight
    pub fn is_saving(&self) -> bool {
        self.shared.lock_state().is_saving
    }

    /// Saved entries, most recent first
    pub fn history(&self) -> Vec<String> {
        self.shared.lock_state().history.clone()
    }

    /// Whether an edit is waiting for its debounce window to elapse
    pub fn has_pending_save(&self) -> bool {
        self.shared.lock_state().pending.is_some()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.shared.lock_state().snapshot()
    }

    /// Watch the document; a new snapshot is published on every change
    pub fn subscribe(&self) -> watch::Receiver<DocumentSnapshot> {
        self.shared.changes.subscribe()
    }

    /// Replace the content and (re)schedule the autosave
    pub fn set_content(&self, text: impl Into<String>) {
        let mut state = self.shared.lock_state();
        self.shared.replace_content(&mut state, text.into());
    }

    /// Move the current content into history and start a blank entry
    ///
    /// Blank (empty or whitespace-only) content is discarded rather than
    /// kept as an entry. The content reset is an edit like any other, so the
    /// empty document is autosaved too. A save of the previous content that
    /// has already fired still completes.
    pub fn create_new_entry(&self) {
        let mut state = self.shared.lock_state();

        if !state.content.trim().is_empty() {
            let entry = state.content.clone();
            state.history.insert(0, entry);
            info!(entries = state.history.len(), "Created new entry");
        }

        self.shared.replace_content(&mut state, String::new());
    }

    /// Load `history[index]` into the editor, leaving history unchanged
    pub fn select_history(&self, index: usize) -> Result<(), DocumentError> {
        let mut state = self.shared.lock_state();

        let entry = state
            .history
            .get(index)
            .cloned()
            .ok_or(DocumentError::EntryOutOfRange {
                index,
                len: state.history.len(),
            })?;

        self.shared.replace_content(&mut state, entry);
        Ok(())
    }

    /// Snapshot the current content as a file ready to hand to a "save as"
    pub fn export_current_content(&self) -> ExportFile {
        ExportFile::snapshot(&self.content(), chrono::Utc::now())
    }

    /// Save right away instead of waiting for the debounce window
    ///
    /// Cancels the pending save, waits for any save already in flight, then
    /// writes the current content.
    pub async fn flush(&self) {
        let content = {
            let mut state = self.shared.lock_state();
            if let Some(pending) = state.pending.take() {
                pending.cancel();
            }
            state.content.clone()
        };

        self.shared.save(content).await;
    }
}
