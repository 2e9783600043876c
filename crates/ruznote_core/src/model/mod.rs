//! Domain model for the note lifecycle engine.
//!
//! # Responsibility
//! - Define the durable `Note` record shared by stores and the controller.
//!
//! # Invariants
//! - `id == 0` denotes a record that has not been persisted yet.
//! - `updated_at >= created_at` for every persisted note.

pub mod note;
