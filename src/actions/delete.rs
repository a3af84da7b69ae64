//! Best-effort batch file deletion with an append-only audit log.
//!
//! # Overview
//!
//! This module removes operator-selected duplicate files:
//! - One log line is appended per attempt (`Deleted`, `Missing`, or
//!   `Denied`), so the text log is a complete record of the batch.
//! - A path that vanished before removal is informational, never an
//!   error; a permission failure is surfaced distinctly.
//! - One bad path never blocks the rest of the batch.
//! - A batch with at least one actual deletion is recorded in the
//!   [`HistoryStore`] as a single entry.
//!
//! # Example
//!
//! ```no_run
//! use dupehist::actions::delete_files;
//! use dupehist::history::HistoryStore;
//! use std::path::{Path, PathBuf};
//!
//! let history = HistoryStore::open(Path::new("/tmp/history.db")).unwrap();
//! let batch = delete_files(
//!     &[PathBuf::from("/data/copy.txt")],
//!     Path::new("/tmp/cleaner.log"),
//!     &history,
//! )
//! .unwrap();
//! println!("freed {} bytes", batch.bytes_freed);
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::history::{HistoryEntry, HistoryError, HistoryStore};

/// Error type for deletion batches.
///
/// Per-path failures are reported through [`DeleteOutcome`], not here;
/// these variants abort the batch because the audit surfaces themselves
/// are unavailable.
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    /// The deletion log could not be opened or written.
    #[error("failed to write deletion log {path}: {source}")]
    Log {
        /// Log file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The history store rejected the batch record.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Outcome of one attempted deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeleteOutcome {
    /// The file was removed; `size` bytes were freed.
    Deleted {
        /// Size of the removed file in bytes
        size: u64,
    },
    /// The file was already absent. Informational, not a failure: a
    /// re-submitted stale selection or a racing process got there first.
    Missing,
    /// The file exists but could not be removed (permissions or another
    /// OS-level refusal). Needs operator attention.
    Denied {
        /// Human-readable failure reason
        reason: String,
    },
}

impl DeleteOutcome {
    /// Whether this outcome freed space.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    /// Bytes freed by this outcome (0 unless deleted).
    #[must_use]
    pub fn bytes(&self) -> u64 {
        match self {
            Self::Deleted { size } => *size,
            _ => 0,
        }
    }
}

/// One attempted deletion: the path and what happened to it.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionRecord {
    /// Path that was attempted.
    pub path: PathBuf,
    /// What happened.
    pub outcome: DeleteOutcome,
}

/// Results of a whole deletion batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Per-path outcomes, in submission order.
    pub records: Vec<DeletionRecord>,
    /// Total bytes freed by the batch.
    pub bytes_freed: u64,
    /// The history entry recorded for this batch, if any deletion
    /// succeeded.
    pub history_entry: Option<HistoryEntry>,
}

impl BatchOutcome {
    /// Number of files actually removed.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_deleted())
            .count()
    }

    /// Number of paths that were already absent.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == DeleteOutcome::Missing)
            .count()
    }

    /// Number of paths the OS refused to remove.
    #[must_use]
    pub fn denied_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, DeleteOutcome::Denied { .. }))
            .count()
    }

    /// Paths that were actually removed, in submission order.
    #[must_use]
    pub fn deleted_paths(&self) -> Vec<PathBuf> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_deleted())
            .map(|r| r.path.clone())
            .collect()
    }

    /// Human-readable summary of the batch.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Deleted {} file(s), {} missing, {} denied, freed {} bytes",
            self.deleted_count(),
            self.missing_count(),
            self.denied_count(),
            self.bytes_freed
        )
    }
}

/// Delete `paths`, logging each attempt to `log_path` and recording the
/// batch in `history`.
///
/// Per-path semantics:
/// - success: bytes accumulated, log line `Deleted <path>`
/// - already absent: log line `Missing <path>`, not an error
/// - any other removal failure: log line `Denied <path>: <reason>`,
///   surfaced in the outcome, batch continues
///
/// After the batch, if at least one file was actually deleted, exactly
/// one [`HistoryEntry`] is appended (deleted paths plus the batch
/// total). An all-failed batch records nothing.
///
/// # Errors
///
/// - [`DeleteError::Log`] if the log file cannot be opened or appended
/// - [`DeleteError::History`] if the history store cannot record the
///   batch
pub fn delete_files(
    paths: &[PathBuf],
    log_path: &Path,
    history: &HistoryStore,
) -> Result<BatchOutcome, DeleteError> {
    let mut log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| DeleteError::Log {
            path: log_path.to_path_buf(),
            source: e,
        })?;

    let mut batch = BatchOutcome::default();

    for path in paths {
        let outcome = delete_one(path);

        let line = match &outcome {
            DeleteOutcome::Deleted { size } => {
                batch.bytes_freed += size;
                log::info!("Deleted {} ({} bytes)", path.display(), size);
                format!("Deleted {}", path.display())
            }
            DeleteOutcome::Missing => {
                log::info!("Missing {}", path.display());
                format!("Missing {}", path.display())
            }
            DeleteOutcome::Denied { reason } => {
                log::warn!("Failed to delete {}: {}", path.display(), reason);
                format!("Denied {}: {}", path.display(), reason)
            }
        };

        writeln!(log_file, "{line}").map_err(|e| DeleteError::Log {
            path: log_path.to_path_buf(),
            source: e,
        })?;

        batch.records.push(DeletionRecord {
            path: path.clone(),
            outcome,
        });
    }

    if batch.deleted_count() > 0 {
        let entry = history.record(&batch.deleted_paths(), batch.bytes_freed)?;
        batch.history_entry = Some(entry);
    } else {
        log::debug!("No files deleted, nothing recorded to history");
    }

    log::info!("{}", batch.summary());

    Ok(batch)
}

/// Attempt a single removal: stat for size, then unlink.
fn delete_one(path: &Path) -> DeleteOutcome {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return DeleteOutcome::Missing,
        Err(e) => {
            return DeleteOutcome::Denied {
                reason: e.to_string(),
            }
        }
    };

    match fs::remove_file(path) {
        Ok(()) => DeleteOutcome::Deleted { size },
        // Lost a race with another process after the stat.
        Err(e) if e.kind() == io::ErrorKind::NotFound => DeleteOutcome::Missing,
        Err(e) => DeleteOutcome::Denied {
            reason: e.to_string(),
        },
    }
}
