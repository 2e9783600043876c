//! Lifecycle orchestration services.
//!
//! # Responsibility
//! - Drive note CRUD, search, edit-session and undo use-cases over the
//!   injected store collaborators.
//! - Keep presentation layers decoupled from storage and calendar details.

pub mod event;
pub mod note_controller;
pub mod projection;
