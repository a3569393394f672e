//! Domain model for check-in items and their daily records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own clamping and fallback rules applied at construction.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Records reference items by id; completion is derived by explicit lookup.
//! - "Not done today" is the absence of a record, never a zero-count row.

pub mod day;
pub mod item;
pub mod record;
