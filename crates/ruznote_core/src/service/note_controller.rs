//! Note lifecycle controller.
//!
//! # Responsibility
//! - Derive the filtered, display-projected note list from the live store
//!   list and the search query.
//! - Own the edit-session draft, dialog visibility flags, and the derived
//!   `has_changes` value.
//! - Execute destructive operations with single-slot, single-shot undo.
//!
//! # Invariants
//! - Derived cells are recomputed and republished synchronously on every
//!   dependency write; observers never see a value computed from a mix of
//!   old and new dependencies.
//! - At most one pending deletion is live at a time; a new destructive
//!   action overwrites the slot and undo consumes it.
//! - The edit draft and the pending-deletion slot are the only
//!   controller-owned copies of durable data.

use crate::model::note::{Note, NoteId, DEFAULT_COLOR, UNSAVED_NOTE_ID};
use crate::reactive::{Cell, SubscriptionId};
use crate::service::event::{MessageAction, UiEvent};
use crate::service::projection::NoteView;
use crate::store::{NoteStore, SettingsStore, StoreResult};
use chrono::Utc;
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Draft color value meaning "nothing picked yet".
///
/// Distinct from both the persisted theme sentinel [`DEFAULT_COLOR`] and
/// every palette entry; mapped to [`DEFAULT_COLOR`] on save.
pub const UNSET_COLOR: i32 = -1;

/// Single-slot buffer retaining just-removed rows for one undo.
enum PendingDeletion {
    Empty,
    Single(Note),
    Bulk(Vec<Note>),
}

/// Reactive engine around note creation, editing, searching, pinning and
/// deletion with time-boxed recovery. One instance per presentation scope.
pub struct NoteController<N: NoteStore, S: SettingsStore> {
    notes_store: Arc<N>,
    settings: Arc<S>,

    store_list: Cell<Vec<Note>>,
    store_list_subscription: SubscriptionId,

    search_query: Cell<String>,
    notes: Cell<Vec<NoteView>>,

    edit_title: Cell<String>,
    edit_content: Cell<String>,
    edit_color: Cell<i32>,
    edit_pinned: Cell<bool>,
    original_note: Cell<Option<Note>>,
    note_loaded: Cell<bool>,
    has_changes: Cell<bool>,

    note_to_delete: Cell<Option<NoteView>>,
    show_delete_dialog: Cell<bool>,
    show_delete_all_dialog: Cell<bool>,
    show_discard_dialog: Cell<bool>,

    pending_deletion: Mutex<PendingDeletion>,
    events: Mutex<VecDeque<UiEvent>>,
}

impl<N: NoteStore, S: SettingsStore> NoteController<N, S> {
    /// Creates a controller and wires its derived cells.
    ///
    /// Both derived values are computed once immediately, so subscribers
    /// attached afterwards observe consistent initial state.
    pub fn new(notes_store: Arc<N>, settings: Arc<S>) -> Self {
        let store_list = notes_store.notes();
        let search_query = Cell::new(String::new());
        let notes = Cell::new(Vec::new());

        // Cell handles are cheap clones, so the recompute hooks are plain
        // cloneable closures registered on every dependency cell.
        let recompute_list = {
            let (source, query, target) = (store_list.clone(), search_query.clone(), notes.clone());
            move || target.set(project_filtered(&source.get(), &query.get()))
        };
        let store_list_subscription = {
            let hook = recompute_list.clone();
            store_list.subscribe(move |_| hook())
        };
        {
            let hook = recompute_list.clone();
            search_query.subscribe(move |_| hook());
        }
        recompute_list();

        let edit_title = Cell::new(String::new());
        let edit_content = Cell::new(String::new());
        let edit_color = Cell::new(UNSET_COLOR);
        let edit_pinned = Cell::new(false);
        let original_note = Cell::new(None::<Note>);
        let has_changes = Cell::new(false);

        let recompute_changes = {
            let (original, title, content, color, pinned, target) = (
                original_note.clone(),
                edit_title.clone(),
                edit_content.clone(),
                edit_color.clone(),
                edit_pinned.clone(),
                has_changes.clone(),
            );
            move || {
                target.set(compute_has_changes(
                    original.get().as_ref(),
                    &title.get(),
                    &content.get(),
                    color.get(),
                    pinned.get(),
                ))
            }
        };
        let hook = recompute_changes.clone();
        original_note.subscribe(move |_| hook());
        let hook = recompute_changes.clone();
        edit_title.subscribe(move |_| hook());
        let hook = recompute_changes.clone();
        edit_content.subscribe(move |_| hook());
        let hook = recompute_changes.clone();
        edit_color.subscribe(move |_| hook());
        let hook = recompute_changes.clone();
        edit_pinned.subscribe(move |_| hook());
        recompute_changes();

        Self {
            notes_store,
            settings,
            store_list,
            store_list_subscription,
            search_query,
            notes,
            edit_title,
            edit_content,
            edit_color,
            edit_pinned,
            original_note,
            note_loaded: Cell::new(false),
            has_changes,
            note_to_delete: Cell::new(None),
            show_delete_dialog: Cell::new(false),
            show_delete_all_dialog: Cell::new(false),
            show_discard_dialog: Cell::new(false),
            pending_deletion: Mutex::new(PendingDeletion::Empty),
            events: Mutex::new(VecDeque::new()),
        }
    }

    // --- exposed reactive state -------------------------------------------

    /// Filtered, display-projected note list.
    pub fn notes(&self) -> Cell<Vec<NoteView>> {
        self.notes.clone()
    }

    pub fn search_query(&self) -> Cell<String> {
        self.search_query.clone()
    }

    pub fn edit_title(&self) -> Cell<String> {
        self.edit_title.clone()
    }

    pub fn edit_content(&self) -> Cell<String> {
        self.edit_content.clone()
    }

    pub fn edit_color(&self) -> Cell<i32> {
        self.edit_color.clone()
    }

    pub fn edit_pinned(&self) -> Cell<bool> {
        self.edit_pinned.clone()
    }

    /// Whether the current edit session reached the ready state.
    pub fn note_loaded(&self) -> Cell<bool> {
        self.note_loaded.clone()
    }

    /// Derived change flag gating the discard confirmation.
    pub fn has_changes(&self) -> Cell<bool> {
        self.has_changes.clone()
    }

    /// Note staged for single deletion, if any.
    pub fn note_to_delete(&self) -> Cell<Option<NoteView>> {
        self.note_to_delete.clone()
    }

    pub fn show_delete_dialog(&self) -> Cell<bool> {
        self.show_delete_dialog.clone()
    }

    pub fn show_delete_all_dialog(&self) -> Cell<bool> {
        self.show_delete_all_dialog.clone()
    }

    pub fn show_discard_dialog(&self) -> Cell<bool> {
        self.show_discard_dialog.clone()
    }

    pub fn dark_mode(&self) -> Cell<bool> {
        self.settings.dark_mode()
    }

    /// Removes and returns all queued one-shot events, oldest first.
    pub fn drain_events(&self) -> Vec<UiEvent> {
        self.lock_events().drain(..).collect()
    }

    // --- search -----------------------------------------------------------

    /// Updates the search query; the projected list recomputes synchronously.
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.search_query.set(query.into());
    }

    // --- edit session -----------------------------------------------------

    /// Starts an edit session.
    ///
    /// `None` or the unsaved-id sentinel opens a fresh draft in new-note
    /// mode. A known id loads the note into the draft and keeps a snapshot
    /// for change detection. An unknown id leaves the session unloaded.
    pub fn load_note_for_edit(&self, note_id: Option<NoteId>) -> StoreResult<()> {
        let note_id = note_id.unwrap_or(UNSAVED_NOTE_ID);
        if note_id == UNSAVED_NOTE_ID {
            self.reset_edit_state();
            self.original_note.set(None);
            self.note_loaded.set(true);
            return Ok(());
        }

        if let Some(note) = self.notes_store.get_by_id(note_id)? {
            self.original_note.set(Some(note.clone()));
            self.edit_title.set(note.title);
            self.edit_content.set(note.content);
            self.edit_color.set(note.color);
            self.edit_pinned.set(note.is_pinned);
            self.note_loaded.set(true);
        } else {
            warn!("event=note_load status=not_found id={note_id}");
        }
        Ok(())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.edit_title.set(title.into());
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.edit_content.set(content.into());
    }

    pub fn set_color(&self, color: i32) {
        self.edit_color.set(color);
    }

    pub fn set_pinned(&self, pinned: bool) {
        self.edit_pinned.set(pinned);
    }

    /// Handles back navigation from the edit screen.
    ///
    /// Raises the discard confirmation when unsaved changes exist in a
    /// loaded session; otherwise navigates back immediately.
    pub fn request_back(&self) {
        if self.has_changes.get() && self.note_loaded.get() {
            self.show_discard_dialog.set(true);
        } else {
            self.emit(UiEvent::NavigateBack);
        }
    }

    /// Discards the draft, ends the session and navigates back.
    pub fn confirm_discard(&self) {
        self.show_discard_dialog.set(false);
        self.end_edit_session();
        self.emit(UiEvent::NavigateBack);
    }

    /// Keeps the session; only closes the confirmation.
    pub fn cancel_discard(&self) {
        self.show_discard_dialog.set(false);
    }

    /// Persists the draft as a new or updated note.
    ///
    /// Title and content are trimmed; an unset draft color persists as the
    /// theme sentinel. `created_at` is preserved on update (falling back to
    /// now when the original row vanished) and `updated_at` is always
    /// stamped with the current instant.
    pub fn save(&self, note_id: Option<NoteId>) -> StoreResult<()> {
        let now = Utc::now().timestamp_millis();
        let note_id = note_id.unwrap_or(UNSAVED_NOTE_ID);
        let created_at = if note_id == UNSAVED_NOTE_ID {
            now
        } else {
            self.notes_store
                .get_by_id(note_id)?
                .map(|existing| existing.created_at)
                .unwrap_or(now)
        };

        let draft_color = self.edit_color.get();
        let note = Note {
            id: note_id,
            title: self.edit_title.get().trim().to_string(),
            content: self.edit_content.get().trim().to_string(),
            color: if draft_color == UNSET_COLOR {
                DEFAULT_COLOR
            } else {
                draft_color
            },
            is_pinned: self.edit_pinned.get(),
            is_archived: false,
            created_at,
            updated_at: now,
        };

        let id = if note.is_persisted() {
            self.notes_store.update(&note)?;
            note_id
        } else {
            self.notes_store.insert(&note)?
        };
        info!("event=note_saved id={id}");

        self.emit(UiEvent::message("Note saved"));
        self.emit(UiEvent::NavigateBack);
        self.end_edit_session();
        Ok(())
    }

    fn end_edit_session(&self) {
        self.reset_edit_state();
        self.original_note.set(None);
        self.note_loaded.set(false);
    }

    /// Resets the draft fields to their defaults.
    pub fn reset_edit_state(&self) {
        self.edit_title.set(String::new());
        self.edit_content.set(String::new());
        self.edit_color.set(UNSET_COLOR);
        self.edit_pinned.set(false);
    }

    // --- pinning ----------------------------------------------------------

    /// Flips the pinned flag of one note. Unknown ids are a silent no-op.
    ///
    /// No undo is offered; toggling again is its own undo.
    pub fn toggle_pin(&self, note_id: NoteId, currently_pinned: bool) -> StoreResult<()> {
        let Some(mut note) = self.notes_store.get_by_id(note_id)? else {
            return Ok(());
        };
        note.is_pinned = !currently_pinned;
        self.notes_store.update(&note)?;
        info!("event=note_pin_toggled id={note_id} pinned={}", note.is_pinned);
        self.emit(UiEvent::message(if note.is_pinned {
            "Note pinned"
        } else {
            "Note unpinned"
        }));
        Ok(())
    }

    // --- single delete ----------------------------------------------------

    /// Stages one note for deletion and raises the confirmation dialog.
    pub fn request_delete(&self, note: NoteView) {
        self.note_to_delete.set(Some(note));
        self.show_delete_dialog.set(true);
    }

    /// Clears the staged target without touching the store.
    pub fn cancel_delete(&self) {
        self.note_to_delete.set(None);
        self.show_delete_dialog.set(false);
    }

    /// Deletes the staged note and offers a single-shot undo.
    ///
    /// A target that vanished concurrently is downgraded to an error-style
    /// message; the dialog closes either way.
    pub fn confirm_delete(&self) -> StoreResult<()> {
        let Some(staged) = self.note_to_delete.get() else {
            return Ok(());
        };

        let removed = self.notes_store.delete_by_id(staged.id)?;
        self.note_to_delete.set(None);
        self.show_delete_dialog.set(false);

        match removed {
            Some(note) => {
                info!("event=note_deleted id={}", note.id);
                *self.lock_pending() = PendingDeletion::Single(note);
                self.emit(UiEvent::message_with_action(
                    "Note deleted",
                    MessageAction::UndoDelete,
                ));
            }
            None => {
                warn!("event=note_deleted status=not_found id={}", staged.id);
                self.emit(UiEvent::message("Could not delete note"));
            }
        }
        Ok(())
    }

    /// Restores the most recently deleted note, once.
    ///
    /// The restored row keeps its original id and timestamps. Invoking this
    /// when the pending-slot is empty (or holds a bulk deletion) is a no-op.
    pub fn undo_delete(&self) -> StoreResult<()> {
        let note = {
            let mut pending = self.lock_pending();
            match std::mem::replace(&mut *pending, PendingDeletion::Empty) {
                PendingDeletion::Single(note) => note,
                other => {
                    *pending = other;
                    return Ok(());
                }
            }
        };
        self.notes_store.insert(&note)?;
        info!("event=note_delete_undone id={}", note.id);
        Ok(())
    }

    // --- bulk delete ------------------------------------------------------

    /// Raises the delete-all confirmation dialog.
    pub fn request_delete_all(&self) {
        self.show_delete_all_dialog.set(true);
    }

    /// Closes the delete-all confirmation without store effect.
    pub fn cancel_delete_all(&self) {
        self.show_delete_all_dialog.set(false);
    }

    /// Deletes every note and offers a single-shot undo.
    ///
    /// The store reports the removed rows from inside its own critical
    /// section, so no list snapshot is taken here. An already-empty store
    /// only closes the dialog.
    pub fn confirm_delete_all(&self) -> StoreResult<()> {
        let removed = self.notes_store.delete_all()?;
        self.show_delete_all_dialog.set(false);
        if removed.is_empty() {
            return Ok(());
        }

        info!("event=notes_bulk_deleted count={}", removed.len());
        *self.lock_pending() = PendingDeletion::Bulk(removed);
        self.emit(UiEvent::message_with_action(
            "All notes deleted",
            MessageAction::UndoDeleteAll,
        ));
        Ok(())
    }

    /// Restores the rows removed by the last bulk delete, once.
    pub fn undo_delete_all(&self) -> StoreResult<()> {
        let notes = {
            let mut pending = self.lock_pending();
            match std::mem::replace(&mut *pending, PendingDeletion::Empty) {
                PendingDeletion::Bulk(notes) => notes,
                other => {
                    *pending = other;
                    return Ok(());
                }
            }
        };
        for note in &notes {
            self.notes_store.insert(note)?;
        }
        info!("event=notes_bulk_delete_undone count={}", notes.len());
        self.emit(UiEvent::message("Notes restored"));
        Ok(())
    }

    /// Dispatches a message action handed back by the presentation layer.
    pub fn perform_action(&self, action: MessageAction) -> StoreResult<()> {
        match action {
            MessageAction::UndoDelete => self.undo_delete(),
            MessageAction::UndoDeleteAll => self.undo_delete_all(),
        }
    }

    // --- settings ---------------------------------------------------------

    /// Flips the dark-mode flag; last write wins.
    pub fn toggle_theme(&self) -> StoreResult<()> {
        let enabled = !self.settings.dark_mode().get();
        self.settings.set_dark_mode(enabled)
    }

    // --- internals --------------------------------------------------------

    fn emit(&self, event: UiEvent) {
        self.lock_events().push_back(event);
    }

    fn lock_events(&self) -> std::sync::MutexGuard<'_, VecDeque<UiEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, PendingDeletion> {
        self.pending_deletion
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<N: NoteStore, S: SettingsStore> Drop for NoteController<N, S> {
    /// Detaches from the store's live list so an abandoned controller can no
    /// longer observe or recompute anything.
    fn drop(&mut self) {
        self.store_list.unsubscribe(self.store_list_subscription);
    }
}

/// Projects and filters the store list for display.
///
/// Store order is preserved; a blank query passes every note through.
fn project_filtered(notes: &[Note], query: &str) -> Vec<NoteView> {
    notes
        .iter()
        .filter(|note| note.matches_query(query))
        .map(NoteView::from_note)
        .collect()
}

/// Change detection over the draft tuple.
///
/// New-note drafts count as changed once either trimmed text field is
/// non-empty; existing-note drafts compare all four tracked fields against
/// the snapshot, with title/content compared trimmed.
fn compute_has_changes(
    original: Option<&Note>,
    title: &str,
    content: &str,
    color: i32,
    pinned: bool,
) -> bool {
    match original {
        None => !title.trim().is_empty() || !content.trim().is_empty(),
        Some(snapshot) => {
            title.trim() != snapshot.title.trim()
                || content.trim() != snapshot.content.trim()
                || color != snapshot.color
                || pinned != snapshot.is_pinned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_has_changes, project_filtered};
    use crate::model::note::Note;

    fn snapshot() -> Note {
        let mut note = Note::new("Title", "Body", 1_000);
        note.id = 1;
        note.color = 3;
        note
    }

    #[test]
    fn new_note_draft_changes_iff_some_text_present() {
        assert!(!compute_has_changes(None, "", "", super::UNSET_COLOR, false));
        assert!(!compute_has_changes(None, "   ", "  ", super::UNSET_COLOR, false));
        assert!(compute_has_changes(None, "x", "", super::UNSET_COLOR, false));
        assert!(compute_has_changes(None, "", "x", super::UNSET_COLOR, false));
    }

    #[test]
    fn existing_note_draft_compares_all_tracked_fields() {
        let original = snapshot();
        assert!(!compute_has_changes(
            Some(&original),
            "  Title ",
            "Body",
            3,
            false
        ));
        assert!(compute_has_changes(Some(&original), "Other", "Body", 3, false));
        assert!(compute_has_changes(Some(&original), "Title", "Other", 3, false));
        assert!(compute_has_changes(Some(&original), "Title", "Body", 4, false));
        assert!(compute_has_changes(Some(&original), "Title", "Body", 3, true));
    }

    #[test]
    fn projection_filter_preserves_store_order() {
        let notes = vec![
            Note::new("Alpha", "first", 1),
            Note::new("Beta", "second", 2),
            Note::new("Gamma", "ALPHAbet", 3),
        ];
        let filtered = project_filtered(&notes, "alpha");
        let titles: Vec<&str> = filtered.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Gamma"]);

        assert_eq!(project_filtered(&notes, "").len(), 3);
    }
}
