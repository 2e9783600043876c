//! Persian (Jalali) calendar conversion and display formatting.
//!
//! # Responsibility
//! - Project raw epoch-millisecond timestamps into Persian calendar fields.
//! - Keep the display string format stable for stored-data compatibility.
//!
//! # Invariants
//! - Conversion is pure and deterministic; no clock or locale access.
//! - The arithmetic must reproduce the historical algorithm bit-for-bit,
//!   quirks included.

pub mod persian;
