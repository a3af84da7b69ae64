//! Directory walker with deterministic ordering and phased traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting file metadata for duplicate detection. The walk is
//! depth-first and fully sorted: within each directory, files are visited
//! before subdirectories, each group in name order. That ordering is what
//! makes the directory-step cap well-defined: when the walk stops at
//! directory N+1, every file of the N directories already visited has been
//! collected.
//!
//! Per-file failures (unreadable entries, vanished files) never abort the
//! walk; they are returned as [`SkippedFile`] records alongside the
//! successfully collected entries.
//!
//! # Example
//!
//! ```no_run
//! use dupehist::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let outcome = walker.walk().unwrap();
//! println!(
//!     "{} files, {} skipped, {} directories",
//!     outcome.files.len(),
//!     outcome.skipped.len(),
//!     outcome.directories_visited
//! );
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, SkipReason, SkippedFile, WalkerConfig};

/// Result of a single walk invocation.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Files that passed the filters and could be stat'ed.
    pub files: Vec<FileEntry>,
    /// Entries excluded because of per-file failures.
    pub skipped: Vec<SkippedFile>,
    /// Number of directory-traversal steps consumed (the root counts).
    pub directories_visited: usize,
    /// Whether the walk stopped early at the directory cap.
    pub truncated: bool,
    /// Whether the walk stopped early because shutdown was requested.
    pub interrupted: bool,
}

/// Directory walker for deterministic file discovery.
///
/// The walker is stateless across calls: each [`Walker::walk`] starts from
/// the configured root with no persisted cursor. Phased scanning over a
/// large tree is the caller's job, using the directory cap to bound each
/// invocation.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag becomes `true`, the walker stops iteration at the
    /// next entry and marks the outcome as interrupted.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(AtomicOrdering::SeqCst))
    }

    /// Validate the root path before walking.
    fn check_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::NotFound(self.root.clone())
            } else {
                ScanError::Io {
                    path: self.root.clone(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        Ok(())
    }

    /// Walk the tree and collect file entries.
    ///
    /// Traversal is depth-first with files sorted before subdirectories in
    /// each directory, so repeated walks of an unchanged tree return the
    /// same files in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid root (missing, not a
    /// directory, unreadable). Failures on individual entries are reported
    /// through [`WalkOutcome::skipped`].
    pub fn walk(&self) -> Result<WalkOutcome, ScanError> {
        self.check_root()?;

        let extensions = self.config.normalized_extensions();
        // A cap of 0 is treated as "no cap": the bound is only meaningful
        // when positive.
        let cap = self.config.max_directories.filter(|&n| n > 0);

        let mut outcome = WalkOutcome::default();

        let iter = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(compare_files_first);

        for entry in iter {
            if self.is_shutdown_requested() {
                log::info!("Walk interrupted by shutdown request");
                outcome.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    log::debug!("Skipping unreadable entry {}: {}", path.display(), e);
                    outcome
                        .skipped
                        .push(SkippedFile::new(path, SkipReason::Walk(e.to_string())));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                outcome.directories_visited += 1;
                if let Some(cap) = cap {
                    if outcome.directories_visited > cap {
                        log::debug!(
                            "Directory cap of {} reached, stopping walk at {}",
                            cap,
                            entry.path().display()
                        );
                        outcome.directories_visited -= 1;
                        outcome.truncated = true;
                        break;
                    }
                }
                continue;
            }

            let path = entry.path();

            if let Some(exts) = &extensions {
                if !matches_extension(path, exts) {
                    continue;
                }
            }

            // Follows symlinks, like the stat the fingerprinter's read
            // will implicitly perform.
            match fs::metadata(path) {
                Ok(metadata) if metadata.is_file() => {
                    let modified = match metadata.modified() {
                        Ok(m) => m,
                        Err(e) => {
                            outcome.skipped.push(SkippedFile::new(
                                path.to_path_buf(),
                                SkipReason::Stat(e.to_string()),
                            ));
                            continue;
                        }
                    };
                    outcome
                        .files
                        .push(FileEntry::new(path.to_path_buf(), metadata.len(), modified));
                }
                Ok(_) => {
                    // Sockets, FIFOs, symlinks to directories: not regular
                    // files, nothing to fingerprint.
                    continue;
                }
                Err(e) => {
                    log::debug!("Skipping unstatable file {}: {}", path.display(), e);
                    outcome.skipped.push(SkippedFile::new(
                        path.to_path_buf(),
                        SkipReason::Stat(e.to_string()),
                    ));
                }
            }
        }

        log::debug!(
            "Walk of {} finished: {} files, {} skipped, {} directories{}",
            self.root.display(),
            outcome.files.len(),
            outcome.skipped.len(),
            outcome.directories_visited,
            if outcome.truncated { " (truncated)" } else { "" }
        );

        Ok(outcome)
    }
}

/// Sort entries within a directory: files first, then subdirectories,
/// each in name order.
///
/// Files-before-subdirectories is load-bearing for the directory cap: it
/// guarantees that every file of an already-counted directory is yielded
/// before the next directory entry appears.
fn compare_files_first(a: &walkdir::DirEntry, b: &walkdir::DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Case-insensitive suffix match against normalized extensions.
fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}
