//! Deletion history module.
//!
//! This module provides durable, append-only persistence for deletion
//! batches so freed space is always auditable after the fact.
//!
//! # Architecture
//!
//! * [`store`]: SQLite-backed persistence, schema management, and the
//!   record/query operations.
//!
//! Entries are immutable once written: the store appends rows and reads
//! them back newest-first, and nothing in the crate ever updates or
//! deletes a row. Losing audit history is treated as a hard failure, so
//! unlike per-file scan errors, store errors always propagate.

pub mod store;

pub use store::{HistoryEntry, HistoryError, HistoryResult, HistoryStore};
