//! SQLite-backed deletion history store.
//!
//! The backing database lives at an explicit path supplied to
//! [`HistoryStore::open`]; [`HistoryStore::default_path`] resolves the
//! per-user default. Writes are serialized by SQLite itself; WAL journal
//! mode plus a busy timeout lets readers proceed while a write is in
//! flight. Each [`HistoryStore::record`] call is its own transaction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use serde::Serialize;

/// Result alias for history store operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors from the history store.
///
/// All of these are hard failures for the caller: a deletion batch must
/// not complete silently without its audit record.
#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    /// The backing database could not be opened or created.
    #[error("failed to open history store at {path}: {source}")]
    Open {
        /// Database path
        path: PathBuf,
        /// The underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// The parent directory for the database could not be created.
    #[error("failed to create history directory {path}: {source}")]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A read or write against the store failed.
    #[error("history store unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No per-user data directory could be determined.
    #[error("could not determine a per-user data directory")]
    NoDataDir,
}

/// One persisted deletion batch.
///
/// Immutable once written; ordered by `id`, which increases with
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Monotonically increasing identifier.
    pub id: i64,
    /// ISO-8601 UTC timestamp of the batch.
    pub timestamp: String,
    /// Newline-joined list of deleted paths.
    pub paths: String,
    /// Total bytes freed by the batch.
    pub bytes_freed: u64,
}

impl HistoryEntry {
    /// The deleted paths as individual strings.
    #[must_use]
    pub fn path_list(&self) -> Vec<&str> {
        self.paths.lines().collect()
    }
}

/// Append-only store of deletion batches.
pub struct HistoryStore {
    conn: Connection,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Open (or create) the history database at `path`.
    ///
    /// Parent directories are created as needed. The schema is applied on
    /// first use and is a single table of
    /// `(id, timestamp, paths, bytes_freed)`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the directory or database cannot be
    /// created, opened, or migrated.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| HistoryError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| HistoryError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Readers proceed while a write is in flight; writers queue
        // instead of failing fast.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_millis(5000))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS deletion_history (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                paths       TEXT NOT NULL,
                bytes_freed INTEGER NOT NULL
            )",
            [],
        )?;

        log::debug!("History store ready at {}", path.display());

        Ok(Self { conn })
    }

    /// Open the history store at the per-user default location.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if no data directory can be determined or
    /// the database cannot be opened.
    pub fn open_default() -> HistoryResult<Self> {
        Self::open(&Self::default_path()?)
    }

    /// The per-user default database path.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoDataDir`] when the platform data
    /// directory cannot be determined.
    pub fn default_path() -> HistoryResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "dupehist", "dupehist")
            .ok_or(HistoryError::NoDataDir)?;
        Ok(dirs.data_dir().join("history.db"))
    }

    /// Append one deletion batch.
    ///
    /// Never mutates or removes prior rows. Returns the entry as
    /// persisted, including its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the insert fails.
    pub fn record(&self, paths: &[PathBuf], bytes_freed: u64) -> HistoryResult<HistoryEntry> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let joined = paths
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join("\n");

        self.conn.execute(
            "INSERT INTO deletion_history (timestamp, paths, bytes_freed) VALUES (?1, ?2, ?3)",
            params![timestamp, joined, bytes_freed as i64],
        )?;

        let id = self.conn.last_insert_rowid();
        log::info!(
            "Recorded deletion batch #{id}: {} path(s), {} bytes freed",
            paths.len(),
            bytes_freed
        );

        Ok(HistoryEntry {
            id,
            timestamp,
            paths: joined,
            bytes_freed,
        })
    }

    /// Query recorded batches, newest first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Truncate to this many most-recent rows when given.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the query fails.
    pub fn query(&self, limit: Option<usize>) -> HistoryResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, paths, bytes_freed
             FROM deletion_history
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1i64, |n| n as i64);

        let rows = stmt.query_map(params![limit], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                paths: row.get(2)?,
                bytes_freed: row.get::<_, i64>(3)?.max(0) as u64,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Number of recorded batches.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the query fails.
    pub fn len(&self) -> HistoryResult<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM deletion_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether the store has no recorded batches.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the query fails.
    pub fn is_empty(&self) -> HistoryResult<bool> {
        Ok(self.len()? == 0)
    }
}
