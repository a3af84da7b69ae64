//! Output formatters for scan results and deletion history.
//!
//! This module renders core results for the CLI surface:
//! - Plain text for humans (sizes via `bytesize`)
//! - JSON for automation and scripting (see [`json`])
//!
//! # Example
//!
//! ```no_run
//! use dupehist::duplicates::DuplicateFinder;
//! use dupehist::output;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! print!("{}", output::render_groups_text(&groups, &summary));
//! ```

pub mod json;

pub use json::JsonScanReport;

use bytesize::ByteSize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::history::HistoryEntry;

/// Render duplicate groups as human-readable text.
///
/// Each group lists its members oldest-first; the first member is marked
/// as the keep candidate.
#[must_use]
pub fn render_groups_text(groups: &[DuplicateGroup], summary: &ScanSummary) -> String {
    use std::fmt::Write;

    let mut out = String::new();

    if groups.is_empty() {
        let _ = writeln!(out, "No duplicates found ({} files scanned).", summary.total_files);
    } else {
        for (i, group) in groups.iter().enumerate() {
            let _ = writeln!(
                out,
                "Group {} - {} x {} ({} reclaimable)",
                i + 1,
                group.len(),
                ByteSize(group.size),
                ByteSize(group.wasted_space())
            );
            for (j, file) in group.files.iter().enumerate() {
                let marker = if j == 0 { "keep  " } else { "delete" };
                let _ = writeln!(out, "  [{marker}] {}", file.path.display());
            }
        }
        let _ = writeln!(
            out,
            "\n{} group(s), {} duplicate file(s), {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.wasted_display()
        );
    }

    if summary.truncated {
        let _ = writeln!(
            out,
            "Scan stopped at the directory cap after {} directories; results are partial.",
            summary.directories_visited
        );
    }

    if summary.has_skips() {
        let _ = writeln!(out, "{} file(s) skipped:", summary.skipped.len());
        for skip in &summary.skipped {
            let _ = writeln!(out, "  {} ({})", skip.path.display(), skip.reason);
        }
    }

    out
}

/// Render deletion history entries as human-readable text, newest first.
#[must_use]
pub fn render_history_text(entries: &[HistoryEntry]) -> String {
    use std::fmt::Write;

    if entries.is_empty() {
        return "No deletion history recorded.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "#{} {} - freed {}",
            entry.id,
            entry.timestamp,
            ByteSize(entry.bytes_freed)
        );
        for path in entry.path_list() {
            let _ = writeln!(out, "  {path}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileEntry;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn sample_group() -> DuplicateGroup {
        DuplicateGroup::new(
            "cafe".into(),
            1024,
            vec![
                FileEntry::new(PathBuf::from("/old.txt"), 1024, SystemTime::UNIX_EPOCH),
                FileEntry::new(PathBuf::from("/new.txt"), 1024, SystemTime::now()),
            ],
        )
    }

    #[test]
    fn test_render_groups_text_marks_keep_candidate() {
        let groups = vec![sample_group()];
        let summary = ScanSummary {
            total_files: 2,
            duplicate_groups: 1,
            duplicate_files: 2,
            wasted_bytes: 1024,
            ..ScanSummary::default()
        };

        let text = render_groups_text(&groups, &summary);

        assert!(text.contains("[keep  ] /old.txt"));
        assert!(text.contains("[delete] /new.txt"));
        assert!(text.contains("1 group(s)"));
    }

    #[test]
    fn test_render_groups_text_empty() {
        let summary = ScanSummary {
            total_files: 7,
            ..ScanSummary::default()
        };

        let text = render_groups_text(&[], &summary);
        assert!(text.contains("No duplicates found (7 files scanned)"));
    }

    #[test]
    fn test_render_history_text() {
        let entries = vec![HistoryEntry {
            id: 3,
            timestamp: "2026-08-07T12:00:00Z".into(),
            paths: "/a\n/b".into(),
            bytes_freed: 2048,
        }];

        let text = render_history_text(&entries);

        assert!(text.contains("#3 2026-08-07T12:00:00Z"));
        assert!(text.contains("  /a"));
        assert!(text.contains("  /b"));
    }

    #[test]
    fn test_render_history_text_empty() {
        assert!(render_history_text(&[]).contains("No deletion history"));
    }
}
