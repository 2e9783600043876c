//! One-shot UI events emitted by the controller.
//!
//! # Responsibility
//! - Carry user-visible confirmations and navigation signals to the
//!   presentation layer.
//! - Tag messages that offer an action, so the presentation can hand the
//!   tag back to [`perform_action`](crate::NoteController::perform_action).
//!
//! # Invariants
//! - Events are consumed exactly once; draining transfers ownership.
//! - Actions are single-shot: invoking one after its pending-slot has been
//!   consumed is a no-op, enforced by the controller, not by the event.

/// Action a message can offer; the presentation passes it back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    /// Restore the most recently deleted note.
    UndoDelete,
    /// Restore the notes removed by the last bulk delete.
    UndoDeleteAll,
}

impl MessageAction {
    /// Default button label; localized string tables live outside this core.
    pub fn label(self) -> &'static str {
        match self {
            Self::UndoDelete | Self::UndoDeleteAll => "Undo",
        }
    }
}

/// One-shot event consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Show a transient confirmation, optionally offering an action.
    ShowMessage {
        message: String,
        action: Option<MessageAction>,
    },
    /// Leave the current screen.
    NavigateBack,
}

impl UiEvent {
    pub(crate) fn message(text: impl Into<String>) -> Self {
        Self::ShowMessage {
            message: text.into(),
            action: None,
        }
    }

    pub(crate) fn message_with_action(text: impl Into<String>, action: MessageAction) -> Self {
        Self::ShowMessage {
            message: text.into(),
            action: Some(action),
        }
    }
}
