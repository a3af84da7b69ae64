//! Integration tests for batch deletion and its audit surfaces.

use dupehist::actions::{delete_files, DeleteOutcome};
use dupehist::duplicates::DuplicateFinder;
use dupehist::history::HistoryStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_reference_scenario_scan_then_delete() {
    // a.txt = "hello", b.txt = "hello", c.txt = "world":
    // scan finds one group, deleting b.txt frees 5 bytes.
    let data = tempdir().unwrap();
    let state = tempdir().unwrap();
    let a = write(data.path(), "a.txt", b"hello");
    let b = write(data.path(), "b.txt", b"hello");
    let c = write(data.path(), "c.txt", b"world");
    filetime::set_file_mtime(&a, filetime::FileTime::from_unix_time(1_000, 0)).unwrap();
    filetime::set_file_mtime(&b, filetime::FileTime::from_unix_time(2_000, 0)).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(data.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a.clone(), b.clone()]);

    // Delete everything except the keep candidate.
    let to_delete: Vec<_> = groups[0].paths().into_iter().skip(1).collect();
    let history = HistoryStore::open(&state.path().join("history.db")).unwrap();
    let log_path = state.path().join("cleaner.log");

    let batch = delete_files(&to_delete, &log_path, &history).unwrap();

    assert_eq!(batch.bytes_freed, 5);
    assert!(a.exists());
    assert!(!b.exists());
    assert!(c.exists());
}

#[test]
fn test_delete_appends_deleted_and_missing_lines() {
    let dir = tempdir().unwrap();
    let target = write(dir.path(), "victim.txt", b"123456");
    let absent = dir.path().join("already-gone.txt");
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();
    let log_path = dir.path().join("cleaner.log");

    let batch = delete_files(&[target.clone(), absent.clone()], &log_path, &history).unwrap();

    assert_eq!(batch.bytes_freed, 6);
    assert_eq!(batch.deleted_count(), 1);
    assert_eq!(batch.missing_count(), 1);

    let log = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("Deleted {}", target.display()),
            format!("Missing {}", absent.display()),
        ]
    );
}

#[test]
fn test_missing_path_does_not_raise_and_frees_nothing() {
    let dir = tempdir().unwrap();
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();
    let absent = dir.path().join("phantom.txt");

    let batch = delete_files(
        &[absent.clone()],
        &dir.path().join("cleaner.log"),
        &history,
    )
    .unwrap();

    assert_eq!(batch.bytes_freed, 0);
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].outcome, DeleteOutcome::Missing);
}

#[test]
fn test_successful_batch_is_queryable_via_history() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"aaaa");
    let b = write(dir.path(), "b.txt", b"bb");
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();

    let batch = delete_files(
        &[a.clone(), b.clone()],
        &dir.path().join("cleaner.log"),
        &history,
    )
    .unwrap();
    assert_eq!(batch.bytes_freed, 6);

    let latest = history.query(Some(1)).unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].bytes_freed, 6);
    assert!(latest[0].paths.contains(&*a.to_string_lossy()));
    assert!(latest[0].paths.contains(&*b.to_string_lossy()));
}

#[test]
fn test_all_failed_batch_leaves_history_empty() {
    let dir = tempdir().unwrap();
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();

    delete_files(
        &[dir.path().join("no1"), dir.path().join("no2")],
        &dir.path().join("cleaner.log"),
        &history,
    )
    .unwrap();

    assert!(history.query(None).unwrap().is_empty());
}

#[test]
fn test_partial_batch_records_only_deleted_paths() {
    let dir = tempdir().unwrap();
    let real = write(dir.path(), "real.txt", b"data");
    let absent = dir.path().join("absent.txt");
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();

    delete_files(
        &[absent.clone(), real.clone()],
        &dir.path().join("cleaner.log"),
        &history,
    )
    .unwrap();

    let entries = history.query(None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path_list(), vec![real.to_string_lossy().as_ref()]);
    assert_eq!(entries[0].bytes_freed, 4);
}

#[test]
fn test_repeat_deletion_of_same_selection_is_race_safe() {
    let dir = tempdir().unwrap();
    let target = write(dir.path(), "dup.txt", b"x");
    let history = HistoryStore::open(&dir.path().join("history.db")).unwrap();
    let log_path = dir.path().join("cleaner.log");

    let first = delete_files(&[target.clone()], &log_path, &history).unwrap();
    let second = delete_files(&[target.clone()], &log_path, &history).unwrap();

    assert_eq!(first.deleted_count(), 1);
    assert_eq!(second.deleted_count(), 0);
    assert_eq!(second.missing_count(), 1);
    // Only the first batch reached the history.
    assert_eq!(history.len().unwrap(), 1);
}
