//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "digest": "abc123...",
//!       "size": 1024,
//!       "files": [
//!         {"path": "/a.txt", "size": 1024, "modified": "2026-08-07T12:00:00Z"}
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "directories_visited": 12,
//!     "truncated": false,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "wasted_bytes": 51200,
//!     "skipped": []
//!   }
//! }
//! ```

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::SkippedFile;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files discovered by the walk
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Directory-traversal steps consumed
    pub directories_visited: usize,
    /// Whether the walk stopped early at the directory cap
    pub truncated: bool,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of files across all duplicate groups
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub wasted_bytes: u64,
    /// Files excluded from the scan, with reasons
    pub skipped: Vec<SkippedFile>,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            directories_visited: summary.directories_visited,
            truncated: summary.truncated,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            wasted_bytes: summary.wasted_bytes,
            skipped: summary.skipped.clone(),
        }
    }
}

/// Complete scan report in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonScanReport<'a> {
    /// Confirmed duplicate groups
    pub duplicates: &'a [DuplicateGroup],
    /// Scan statistics
    pub summary: JsonSummary,
}

impl<'a> JsonScanReport<'a> {
    /// Build a report from scan results.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &ScanSummary) -> Self {
        Self {
            duplicates: groups,
            summary: JsonSummary::from(summary),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
