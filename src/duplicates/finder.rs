//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: deterministic traversal collecting file metadata
//!    (see [`crate::scanner::walker`])
//! 2. **Size grouping**: eliminate files with unique sizes
//!    (see [`crate::duplicates::groups`])
//! 3. **Fingerprint**: SHA-256 over remaining candidates, in parallel on
//!    a bounded worker pool
//! 4. **Group**: collect files by (size, digest), keep groups of 2+,
//!    sort members oldest-first
//!
//! Grouping and sorting are order-independent, so results are identical
//! regardless of hash completion order across workers.
//!
//! # Example
//!
//! ```no_run
//! use dupehist::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new("/data")).unwrap();
//! for group in &groups {
//!     println!("{} copies of {} bytes", group.len(), group.size);
//! }
//! println!("{} files skipped", summary.skipped.len());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, HashError, Hasher, ScanError, SkipReason, SkippedFile, Walker, WalkerConfig,
};

use super::groups::{group_by_size, DuplicateGroup};

/// Configuration for a duplicate scan.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Traversal options (extension filter, directory cap).
    pub walker: WalkerConfig,
    /// Number of worker threads for parallel fingerprinting.
    /// 0 means one thread.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker", &self.walker)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }

    /// Set the number of fingerprinting threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files discovered by the walk (after filters, before hashing).
    pub total_files: usize,
    /// Combined size of discovered files in bytes.
    pub total_size: u64,
    /// Directory-traversal steps consumed.
    pub directories_visited: usize,
    /// Whether the walk stopped early at the directory cap.
    pub truncated: bool,
    /// Number of duplicate groups found.
    pub duplicate_groups: usize,
    /// Number of files across all duplicate groups.
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group.
    pub wasted_bytes: u64,
    /// Files excluded from the scan, with reasons.
    pub skipped: Vec<SkippedFile>,
}

impl ScanSummary {
    /// Whether any files were excluded by per-file failures.
    #[must_use]
    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Human-readable reclaimable space.
    #[must_use]
    pub fn wasted_display(&self) -> String {
        bytesize::ByteSize(self.wasted_bytes).to_string()
    }
}

/// Errors that can abort a whole scan.
///
/// Per-file failures are never fatal; they land in
/// [`ScanSummary::skipped`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing the scan root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The scan was interrupted by a shutdown request.
    #[error("scan interrupted")]
    Interrupted,
}

impl From<ScanError> for FinderError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::NotFound(p) => Self::NotFound(p),
            ScanError::NotADirectory(p) => Self::NotADirectory(p),
            ScanError::Io { path, source } => Self::Io { path, source },
        }
    }
}

/// Duplicate file finder.
///
/// One finder can serve many scans; each call to
/// [`DuplicateFinder::find_duplicates`] is independent and stateless.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan `root` for exact-duplicate files.
    ///
    /// Returns the duplicate groups (members oldest-first, groups ordered
    /// by size descending then digest) together with a [`ScanSummary`].
    /// Repeated calls over an unchanged tree return identical results.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `NotADirectory` / `Io` for an invalid root
    /// - `Interrupted` if the shutdown flag was raised mid-scan
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let mut walker = Walker::new(root, self.config.walker.clone());
        if let Some(flag) = &self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        let walk = walker.walk()?;
        if walk.interrupted {
            return Err(FinderError::Interrupted);
        }

        let mut summary = ScanSummary {
            total_files: walk.files.len(),
            total_size: walk.files.iter().map(|f| f.size).sum(),
            directories_visited: walk.directories_visited,
            truncated: walk.truncated,
            skipped: walk.skipped,
            ..ScanSummary::default()
        };

        log::info!(
            "Discovered {} files in {} directories under {}",
            summary.total_files,
            summary.directories_visited,
            root.display()
        );

        // Phase 1: size grouping. Files with a unique size cannot have a
        // byte-identical twin and are never read.
        let (size_groups, grouping) = group_by_size(walk.files);
        log::debug!(
            "Size grouping eliminated {} of {} files ({:.1}%)",
            grouping.eliminated_unique,
            grouping.total_files,
            grouping.elimination_rate()
        );

        // Phase 2: fingerprint the remaining candidates in parallel.
        let candidates: Vec<FileEntry> = size_groups.into_values().flatten().collect();
        let hashed = self.hash_candidates(candidates)?;

        // Phase 3: single-writer aggregation by (size, digest).
        let mut by_content: HashMap<(u64, String), Vec<FileEntry>> = HashMap::new();
        for (file, digest) in hashed {
            match digest {
                Ok(digest) => {
                    by_content.entry((file.size, digest)).or_default().push(file);
                }
                Err(e) => {
                    log::debug!("Skipping unhashable file {}: {}", file.path.display(), e);
                    summary
                        .skipped
                        .push(SkippedFile::new(file.path, SkipReason::Hash(e.to_string())));
                }
            }
        }

        let mut groups: Vec<DuplicateGroup> = by_content
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|((size, digest), mut files)| {
                files.sort_by(|a, b| {
                    a.modified
                        .cmp(&b.modified)
                        .then_with(|| a.path.cmp(&b.path))
                });
                DuplicateGroup::new(digest, size, files)
            })
            .collect();

        // Deterministic group order: largest reclaimable size first.
        groups.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.digest.cmp(&b.digest)));

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::len).sum();
        summary.wasted_bytes = groups.iter().map(DuplicateGroup::wasted_space).sum();

        log::info!(
            "Found {} duplicate groups ({} files, {} reclaimable)",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.wasted_display()
        );

        Ok((groups, summary))
    }

    /// Fingerprint candidates on a bounded pool.
    ///
    /// Each file is hashed by exactly one worker; results carry the file
    /// alongside its digest (or failure) so aggregation stays
    /// order-independent.
    fn hash_candidates(
        &self,
        candidates: Vec<FileEntry>,
    ) -> Result<Vec<(FileEntry, Result<String, HashError>)>, FinderError> {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_hash_start(candidates.len());
        }

        let hasher = &self.hasher;
        let config = &self.config;
        let hash_all = || {
            candidates
                .into_par_iter()
                .map(|file| {
                    if config.is_shutdown_requested() {
                        return None;
                    }
                    let digest = hasher.hash_file(&file.path);
                    if let Some(cb) = &config.progress_callback {
                        cb.on_file_hashed(&file.path);
                    }
                    Some((file, digest))
                })
                .collect::<Vec<_>>()
        };

        let threads = self.config.io_threads.max(1);
        let results = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(hash_all),
            Err(e) => {
                log::warn!("Failed to build hashing pool ({e}), using global pool");
                hash_all()
            }
        };

        if let Some(cb) = &self.config.progress_callback {
            cb.on_hash_complete();
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        Ok(results.into_iter().flatten().collect())
    }
}
