//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Deterministic, sorted directory walking
//! - Extension-based file filtering
//! - Bounded (phased) traversal via a directory-step cap
//! - Content fingerprinting with SHA-256
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file fingerprinting (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupehist::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! // Only consider images, stop after 100 directories
//! let config = WalkerConfig::default()
//!     .with_extensions(vec!["jpg".into(), ".png".into()])
//!     .with_max_directories(Some(100));
//!
//! let walker = Walker::new(Path::new("."), config);
//! let outcome = walker.walk().unwrap();
//! for file in &outcome.files {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

// Re-export main types
pub use hasher::{hash_to_hex, Hasher, CHUNK_SIZE};
pub use walker::{WalkOutcome, Walker};

/// Metadata for a discovered file.
///
/// Contains everything duplicate detection needs: path, size, and
/// modification time. Rebuilt on every scan, never persisted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    #[serde(serialize_with = "serialize_modified")]
    pub modified: SystemTime,
}

/// Render a modification time as an ISO-8601 UTC string for JSON output.
fn serialize_modified<S: serde::Serializer>(
    time: &SystemTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let datetime: chrono::DateTime<chrono::Utc> = (*time).into();
    serializer.serialize_str(&datetime.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Extension filter. When present, only files whose name ends with one
    /// of these suffixes (case-insensitive) are considered; everything else
    /// is skipped before any stat or hash. Entries are accepted with or
    /// without a leading dot (`jpg` and `.jpg` are equivalent).
    pub extensions: Option<Vec<String>>,

    /// Cap on the number of directory-traversal steps for a single walk.
    /// The root counts as the first step. Once the cap is reached the walk
    /// stops early; only files of directories already visited are returned.
    pub max_directories: Option<usize>,
}

impl WalkerConfig {
    /// Set the extension filter.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Set the directory-step cap.
    #[must_use]
    pub fn with_max_directories(mut self, max: Option<usize>) -> Self {
        self.max_directories = max;
        self
    }

    /// Normalized, lowercased suffixes with a leading dot.
    ///
    /// Returns `None` when no filter is configured (all files pass).
    #[must_use]
    pub fn normalized_extensions(&self) -> Option<Vec<String>> {
        self.extensions.as_ref().map(|exts| {
            exts.iter()
                .map(|e| {
                    let e = e.trim().to_lowercase();
                    if e.starts_with('.') {
                        e
                    } else {
                        format!(".{e}")
                    }
                })
                .collect()
        })
    }
}

/// Why a single file was excluded from a scan.
///
/// Per-file failures never abort a scan; they are aggregated so callers
/// and tests can assert on the reason instead of inferring it from
/// absence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum SkipReason {
    /// The directory entry could not be read during traversal.
    Walk(String),
    /// Reading file metadata (size, mtime) failed.
    Stat(String),
    /// Fingerprinting the file contents failed.
    Hash(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Walk(msg) => write!(f, "walk error: {msg}"),
            Self::Stat(msg) => write!(f, "stat error: {msg}"),
            Self::Hash(msg) => write!(f, "hash error: {msg}"),
        }
    }
}

/// A file (or directory entry) excluded from a scan, with the reason.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedFile {
    /// Path that was skipped. May be empty for traversal errors with no
    /// associated path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

impl SkippedFile {
    /// Create a new skip record.
    #[must_use]
    pub fn new(path: PathBuf, reason: SkipReason) -> Self {
        Self { path, reason }
    }
}

/// Errors that can occur when starting a directory scan.
///
/// Per-file failures inside a running scan are reported as
/// [`SkippedFile`] records instead; these variants are for invalid
/// top-level arguments only.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing the root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file fingerprinting.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_new() {
        let entry = FileEntry::new(PathBuf::from("/test/file.txt"), 1024, SystemTime::now());

        assert_eq!(entry.path, PathBuf::from("/test/file.txt"));
        assert_eq!(entry.size, 1024);
    }

    #[test]
    fn test_walker_config_default() {
        let config = WalkerConfig::default();

        assert!(config.extensions.is_none());
        assert!(config.max_directories.is_none());
        assert!(config.normalized_extensions().is_none());
    }

    #[test]
    fn test_extension_normalization() {
        let config = WalkerConfig::default()
            .with_extensions(vec!["jpg".into(), ".PNG".into(), " gif ".into()]);

        let normalized = config.normalized_extensions().unwrap();
        assert_eq!(normalized, vec![".jpg", ".png", ".gif"]);
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Path not found: /missing");

        let err = ScanError::NotADirectory(PathBuf::from("/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /file.txt");
    }

    #[test]
    fn test_hash_error_display() {
        let err = HashError::NotFound(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "File not found: /test");

        let err = HashError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "Permission denied: /secret");
    }

    #[test]
    fn test_skip_reason_display() {
        let skip = SkippedFile::new(
            PathBuf::from("/x"),
            SkipReason::Hash("permission denied".into()),
        );
        assert!(skip.reason.to_string().contains("hash error"));
    }
}
