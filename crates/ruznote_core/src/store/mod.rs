//! Storage collaborator contracts.
//!
//! # Responsibility
//! - Define the `NoteStore` and `SettingsStore` interfaces consumed by the
//!   lifecycle controller.
//! - Keep the controller free of any concrete persistence detail.
//!
//! # Invariants
//! - `NoteStore::notes()` is a live list: the store republishes the full
//!   ordered list after every mutation, atomically.
//! - Destructive operations return the removed rows so undo never needs a
//!   read-then-delete snapshot of live state.
//! - Store failures are not recovered here; callers propagate them.

use crate::model::note::{Note, NoteId};
use crate::reactive::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;

pub use memory::{MemoryNoteStore, MemorySettingsStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying durable engine failed; the message is backend-defined.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "note store backend error: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Durable note storage, keyed by an opaque monotonically-assigned id.
pub trait NoteStore: Send + Sync {
    /// Fetches one note; `None` when the id is unknown.
    fn get_by_id(&self, id: NoteId) -> StoreResult<Option<Note>>;

    /// Persists a note and returns its id.
    ///
    /// Assigns the next free id when `note.id == UNSAVED_NOTE_ID`; otherwise
    /// the caller-provided id is honored (undo restores rows this way,
    /// preserving identity and original timestamps).
    fn insert(&self, note: &Note) -> StoreResult<NoteId>;

    /// Replaces an existing note. A missing id is a silent no-op.
    fn update(&self, note: &Note) -> StoreResult<()>;

    /// Deletes one note and returns the removed row, if any.
    fn delete_by_id(&self, id: NoteId) -> StoreResult<Option<Note>>;

    /// Deletes every note and returns the removed rows in list order.
    fn delete_all(&self) -> StoreResult<Vec<Note>>;

    /// Live, ordered note list.
    ///
    /// Ordering is store-defined (pinned first, then recency) and must be
    /// stable between mutations.
    fn notes(&self) -> Cell<Vec<Note>>;
}

/// Reactive application settings flags with last-write-wins setters.
pub trait SettingsStore: Send + Sync {
    fn dark_mode(&self) -> Cell<bool>;
    fn set_dark_mode(&self, enabled: bool) -> StoreResult<()>;

    fn grid_mode(&self) -> Cell<bool>;
    fn set_grid_mode(&self, enabled: bool) -> StoreResult<()>;

    /// Whether note timestamps are displayed in the Persian calendar.
    fn persian_date(&self) -> Cell<bool>;
    fn set_persian_date(&self, enabled: bool) -> StoreResult<()>;

    /// App language: `0` = fa, `1` = en.
    fn language(&self) -> Cell<i32>;
    fn set_language(&self, language: i32) -> StoreResult<()>;
}
