//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical durable record owned by `NoteStore`.
//! - Pin down the id and color sentinel values used across the crate.
//!
//! # Invariants
//! - `id` is an opaque store-assigned integer; `0` means "not yet persisted".
//! - `created_at` is immutable after first persistence; `updated_at` changes
//!   on every save and is never below `created_at`.
//! - `is_archived` is reserved and always written as `false`.

use serde::{Deserialize, Serialize};

/// Opaque monotonically-assigned note identifier.
pub type NoteId = i64;

/// Id value for notes that have not been persisted yet.
pub const UNSAVED_NOTE_ID: NoteId = 0;

/// Color sentinel meaning "use the theme default surface color".
pub const DEFAULT_COLOR: i32 = 0;

/// Durable note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier; [`UNSAVED_NOTE_ID`] before first insert.
    pub id: NoteId,
    /// Title text; may be empty.
    pub title: String,
    /// Body text; may be empty.
    pub content: String,
    /// ARGB-encoded card color; [`DEFAULT_COLOR`] inherits the theme surface.
    pub color: i32,
    pub is_pinned: bool,
    /// Reserved for a future archive view; always `false` on write.
    pub is_archived: bool,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
    /// Last-save instant in epoch milliseconds; `>= created_at`.
    pub updated_at: i64,
}

impl Note {
    /// Creates an unsaved note stamped with one instant for both timestamps.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: UNSAVED_NOTE_ID,
            title: title.into(),
            content: content.into(),
            color: DEFAULT_COLOR,
            is_pinned: false,
            is_archived: false,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Returns whether this note has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_NOTE_ID
    }

    /// Case-insensitive substring match over title and content.
    ///
    /// A blank query matches every note. Non-blank queries match verbatim;
    /// edge and interior whitespace is significant.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, DEFAULT_COLOR, UNSAVED_NOTE_ID};

    #[test]
    fn new_note_starts_unsaved_with_equal_timestamps() {
        let note = Note::new("a", "b", 1_000);
        assert_eq!(note.id, UNSAVED_NOTE_ID);
        assert!(!note.is_persisted());
        assert_eq!(note.color, DEFAULT_COLOR);
        assert_eq!(note.created_at, note.updated_at);
        assert!(!note.is_archived);
    }

    #[test]
    fn matches_query_is_case_insensitive_over_both_fields() {
        let note = Note::new("Groceries", "buy Milk", 0);
        assert!(note.matches_query("groc"));
        assert!(note.matches_query("MILK"));
        assert!(note.matches_query(""));
        assert!(note.matches_query("   "));
        assert!(!note.matches_query("xyz"));
    }

    #[test]
    fn query_whitespace_is_significant_when_not_blank() {
        let note = Note::new("milk list", "", 0);
        assert!(note.matches_query("milk"));
        assert!(note.matches_query("milk l"));
        assert!(!note.matches_query(" milk "));
        assert!(!note.matches_query("milk  list"));
    }

    #[test]
    fn note_round_trips_through_serde() {
        let note = Note {
            id: 7,
            title: "t".to_string(),
            content: "c".to_string(),
            color: -1,
            is_pinned: true,
            is_archived: false,
            created_at: 10,
            updated_at: 20,
        };
        let json = serde_json::to_string(&note).expect("note serializes");
        let back: Note = serde_json::from_str(&json).expect("note deserializes");
        assert_eq!(back, note);
    }
}
