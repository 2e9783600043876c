//! Note lifecycle and temporal display engine for RuzNote.
//!
//! This crate is the single source of truth for note business invariants:
//! the Persian calendar projection of stored timestamps, the reactive
//! edit/search/delete state machine, and the single-slot undo contract.
//! Persistence and presentation are injected collaborators.

pub mod calendar;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod service;
pub mod store;

pub use calendar::persian::PersianDate;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, DEFAULT_COLOR, UNSAVED_NOTE_ID};
pub use reactive::{Cell, SubscriptionId};
pub use service::event::{MessageAction, UiEvent};
pub use service::note_controller::{NoteController, UNSET_COLOR};
pub use service::projection::NoteView;
pub use store::{
    MemoryNoteStore, MemorySettingsStore, NoteStore, SettingsStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
