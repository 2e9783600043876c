//! Display projection of persisted notes.
//!
//! # Responsibility
//! - Derive the read-only list item shown by the presentation layer,
//!   including both Persian-formatted timestamps.
//!
//! # Invariants
//! - Projections are ephemeral: recomputed on every list republication and
//!   never persisted.

use crate::calendar::persian::PersianDate;
use crate::model::note::{Note, NoteId};

/// Read-only, display-oriented derivation of one [`Note`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub color: i32,
    pub is_pinned: bool,
    /// `created_at` rendered by the Persian calendar converter.
    pub created_at_display: String,
    /// `updated_at` rendered by the Persian calendar converter.
    pub updated_at_display: String,
}

impl NoteView {
    /// Projects one persisted note for display.
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            color: note.color,
            is_pinned: note.is_pinned,
            created_at_display: PersianDate::from_timestamp_millis(note.created_at).full_display(),
            updated_at_display: PersianDate::from_timestamp_millis(note.updated_at).full_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteView;
    use crate::model::note::Note;

    #[test]
    fn projection_renders_both_timestamps() {
        let mut note = Note::new("t", "c", 1_710_937_805_000);
        note.id = 3;
        note.updated_at = 1_756_713_840_000;

        let view = NoteView::from_note(&note);
        assert_eq!(view.id, 3);
        assert_eq!(view.created_at_display, "چهارشنبه، 1 فروردین 1403 - 12:30");
        assert_eq!(view.updated_at_display, "دوشنبه، 10 شهریور 1404 - 08:04");
    }
}
