//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides structures for grouping files by size (the first
//! phase of duplicate detection) and the [`DuplicateGroup`] type returned
//! to callers once content fingerprints confirm a match.
//!
//! Size grouping eliminates most non-duplicates instantly, since files
//! with different sizes cannot be byte-identical; only files sharing a
//! size with at least one other file are ever fingerprinted.
//!
//! # Example
//!
//! ```
//! use dupehist::scanner::FileEntry;
//! use dupehist::duplicates::group_by_size;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);  // Two 1024-byte files
//! assert_eq!(groups.len(), 1);  // Only one size with multiple files
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// Group files by exact size, keeping only sizes with potential duplicates.
///
/// Returns the size → files map (groups of 2+ only) together with
/// statistics about the elimination pass.
#[must_use]
pub fn group_by_size(files: Vec<FileEntry>) -> (HashMap<u64, Vec<FileEntry>>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: files.len(),
        ..GroupingStats::default()
    };

    let mut by_size: HashMap<u64, Vec<FileEntry>> = HashMap::new();
    for file in files {
        stats.total_size += file.size;
        by_size.entry(file.size).or_default().push(file);
    }
    stats.unique_sizes = by_size.len();

    by_size.retain(|_, group| group.len() > 1);

    stats.duplicate_groups = by_size.len();
    stats.potential_duplicates = by_size.values().map(Vec::len).sum();
    stats.eliminated_unique = stats.total_files - stats.potential_duplicates;

    (by_size, stats)
}

/// Statistics from the size-grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could still be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton sizes)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Confirmed group of byte-identical files.
///
/// Invariants: every member shares `size` and `digest`, the group has at
/// least 2 members, and members ascend by modification time (ties broken
/// by path). The oldest member, index 0, is the conventional "keep"
/// candidate.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Hex-encoded SHA-256 digest of the shared file content
    pub digest: String,
    /// File size in bytes, shared by all members
    pub size: u64,
    /// Member files, oldest first
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Arguments
    ///
    /// * `digest` - Hex-encoded content digest
    /// * `size` - File size in bytes
    /// * `files` - Member files, already sorted oldest first
    #[must_use]
    pub fn new(digest: String, size: u64, files: Vec<FileEntry>) -> Self {
        Self {
            digest,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Space reclaimable by deleting all copies except the oldest.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        if self.files.len() > 1 {
            self.size * (self.files.len() as u64 - 1)
        } else {
            0
        }
    }

    /// Number of duplicate copies (total minus the keep candidate).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// The keep candidate: the oldest member.
    #[must_use]
    pub fn keep_candidate(&self) -> Option<&FileEntry> {
        self.files.first()
    }
}
