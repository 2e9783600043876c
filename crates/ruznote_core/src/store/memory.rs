//! In-memory reference stores.
//!
//! # Responsibility
//! - Provide backend-free `NoteStore`/`SettingsStore` implementations for
//!   tests and embedders without a durable engine.
//! - Demonstrate the live-list republication contract.
//!
//! # Invariants
//! - Assigned ids are strictly increasing and never reused, even after
//!   deletes or undo re-inserts with explicit ids.
//! - The list cell is republished after every mutation, ordered pinned-first
//!   then `updated_at` descending, ties broken by ascending id.

use crate::model::note::{Note, NoteId, UNSAVED_NOTE_ID};
use crate::reactive::Cell;
use crate::store::{NoteStore, SettingsStore, StoreResult};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Reference `NoteStore` backed by an in-process map.
pub struct MemoryNoteStore {
    rows: Mutex<MemoryRows>,
    list: Cell<Vec<Note>>,
}

struct MemoryRows {
    by_id: BTreeMap<NoteId, Note>,
    next_id: NoteId,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(MemoryRows {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
            list: Cell::new(Vec::new()),
        }
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, MemoryRows> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Builds the published list order: pinned first, then recency.
    fn ordered(rows: &MemoryRows) -> Vec<Note> {
        let mut ordered: Vec<Note> = rows.by_id.values().cloned().collect();
        ordered.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then(b.updated_at.cmp(&a.updated_at))
                .then(a.id.cmp(&b.id))
        });
        ordered
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for MemoryNoteStore {
    fn get_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.lock_rows().by_id.get(&id).cloned())
    }

    fn insert(&self, note: &Note) -> StoreResult<NoteId> {
        let (id, ordered) = {
            let mut rows = self.lock_rows();
            let mut stored = note.clone();
            if stored.id == UNSAVED_NOTE_ID {
                stored.id = rows.next_id;
            }
            // Keep the watermark above every id ever seen, including
            // explicit ids re-inserted by undo.
            rows.next_id = rows.next_id.max(stored.id + 1);
            let id = stored.id;
            rows.by_id.insert(id, stored);
            (id, Self::ordered(&rows))
        };
        // Republish outside the rows lock so listeners may call back in.
        self.list.set(ordered);
        Ok(id)
    }

    fn update(&self, note: &Note) -> StoreResult<()> {
        let ordered = {
            let mut rows = self.lock_rows();
            if !rows.by_id.contains_key(&note.id) {
                return Ok(());
            }
            rows.by_id.insert(note.id, note.clone());
            Self::ordered(&rows)
        };
        self.list.set(ordered);
        Ok(())
    }

    fn delete_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let (removed, ordered) = {
            let mut rows = self.lock_rows();
            let removed = rows.by_id.remove(&id);
            if removed.is_none() {
                return Ok(None);
            }
            (removed, Self::ordered(&rows))
        };
        self.list.set(ordered);
        Ok(removed)
    }

    fn delete_all(&self) -> StoreResult<Vec<Note>> {
        let removed = {
            let mut rows = self.lock_rows();
            let removed = Self::ordered(&rows);
            rows.by_id.clear();
            removed
        };
        self.list.set(Vec::new());
        Ok(removed)
    }

    fn notes(&self) -> Cell<Vec<Note>> {
        self.list.clone()
    }
}

/// Reference `SettingsStore` holding flags in reactive cells.
pub struct MemorySettingsStore {
    dark_mode: Cell<bool>,
    grid_mode: Cell<bool>,
    persian_date: Cell<bool>,
    language: Cell<i32>,
}

impl MemorySettingsStore {
    /// Creates a store with the application defaults: light theme, grid
    /// layout, Persian dates on, language fa.
    pub fn new() -> Self {
        Self {
            dark_mode: Cell::new(false),
            grid_mode: Cell::new(true),
            persian_date: Cell::new(true),
            language: Cell::new(0),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn dark_mode(&self) -> Cell<bool> {
        self.dark_mode.clone()
    }

    fn set_dark_mode(&self, enabled: bool) -> StoreResult<()> {
        self.dark_mode.set(enabled);
        Ok(())
    }

    fn grid_mode(&self) -> Cell<bool> {
        self.grid_mode.clone()
    }

    fn set_grid_mode(&self, enabled: bool) -> StoreResult<()> {
        self.grid_mode.set(enabled);
        Ok(())
    }

    fn persian_date(&self) -> Cell<bool> {
        self.persian_date.clone()
    }

    fn set_persian_date(&self, enabled: bool) -> StoreResult<()> {
        self.persian_date.set(enabled);
        Ok(())
    }

    fn language(&self) -> Cell<i32> {
        self.language.clone()
    }

    fn set_language(&self, language: i32) -> StoreResult<()> {
        self.language.set(language);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNoteStore, MemorySettingsStore};
    use crate::model::note::Note;
    use crate::store::{NoteStore, SettingsStore};

    fn note(title: &str, at: i64) -> Note {
        Note::new(title, "", at)
    }

    #[test]
    fn insert_assigns_strictly_increasing_ids() {
        let store = MemoryNoteStore::new();
        let first = store.insert(&note("a", 1)).unwrap();
        let second = store.insert(&note("b", 2)).unwrap();
        assert!(second > first);

        // Re-inserting a deleted row keeps its id and does not disturb the
        // watermark.
        let removed = store.delete_by_id(first).unwrap().unwrap();
        store.insert(&removed).unwrap();
        let third = store.insert(&note("c", 3)).unwrap();
        assert!(third > second);
        assert_eq!(store.get_by_id(first).unwrap().unwrap().title, "a");
    }

    #[test]
    fn list_orders_pinned_first_then_recency() {
        let store = MemoryNoteStore::new();
        let old_pinned = {
            let mut n = note("pinned", 10);
            n.is_pinned = true;
            n
        };
        store.insert(&old_pinned).unwrap();
        store.insert(&note("newest", 30)).unwrap();
        store.insert(&note("older", 20)).unwrap();

        let titles: Vec<String> = store
            .notes()
            .get()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["pinned", "newest", "older"]);
    }

    #[test]
    fn update_with_unknown_id_is_a_silent_noop() {
        let store = MemoryNoteStore::new();
        let mut ghost = note("ghost", 1);
        ghost.id = 99;
        store.update(&ghost).unwrap();
        assert!(store.notes().get().is_empty());
    }

    #[test]
    fn delete_all_returns_removed_rows_in_list_order() {
        let store = MemoryNoteStore::new();
        store.insert(&note("a", 1)).unwrap();
        store.insert(&note("b", 2)).unwrap();

        let removed = store.delete_all().unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].title, "b");
        assert!(store.notes().get().is_empty());

        // Empty store: nothing to remove, list stays empty.
        assert!(store.delete_all().unwrap().is_empty());
    }

    #[test]
    fn settings_defaults_match_the_application() {
        let settings = MemorySettingsStore::new();
        assert!(!settings.dark_mode().get());
        assert!(settings.grid_mode().get());
        assert!(settings.persian_date().get());
        assert_eq!(settings.language().get(), 0);

        settings.set_dark_mode(true).unwrap();
        settings.set_language(1).unwrap();
        assert!(settings.dark_mode().get());
        assert_eq!(settings.language().get(), 1);
    }
}
