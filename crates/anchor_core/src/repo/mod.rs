//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for items and records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Item writes must pass `CheckInItem::validate()` before persistence.
//! - Record writes must carry an owning item id.
//! - Repository APIs return semantic errors (`ItemNotFound`,
//!   `RecordNotFound`) in addition to DB transport errors.

pub mod item_repo;
pub mod record_repo;
