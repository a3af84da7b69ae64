//! Actions that mutate the filesystem.
//!
//! Currently a single action lives here: best-effort batch deletion of
//! duplicate files, with an append-only text log and a history record
//! per batch (see [`delete`]).

pub mod delete;

pub use delete::{delete_files, BatchOutcome, DeleteError, DeleteOutcome, DeletionRecord};
