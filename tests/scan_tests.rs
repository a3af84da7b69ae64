//! Integration tests for the scan pipeline.

use dupehist::duplicates::{DuplicateFinder, FinderConfig};
use dupehist::scanner::WalkerConfig;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn set_mtime(path: &Path, unix_secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
}

fn finder_with(walker: WalkerConfig) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
}

#[test]
fn test_identical_pair_yields_one_group() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"identical bytes");
    let b = write(dir.path(), "b.txt", b"identical bytes");
    write(dir.path(), "other.txt", b"something else entirely");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    let mut members = groups[0].paths();
    members.sort();
    assert_eq!(members, vec![a, b]);
}

#[test]
fn test_no_identical_pairs_yields_no_groups() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.txt", b"first");
    write(dir.path(), "two.txt", b"second");
    write(dir.path(), "three.txt", b"third");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
}

#[test]
fn test_groups_span_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("deep/nested")).unwrap();
    let top = write(dir.path(), "top.dat", b"shared payload");
    let deep = write(&dir.path().join("deep/nested"), "deep.dat", b"shared payload");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    let mut members = groups[0].paths();
    members.sort();
    let mut expected = vec![top, deep];
    expected.sort();
    assert_eq!(members, expected);
}

#[test]
fn test_group_members_non_decreasing_by_mtime() {
    let dir = tempdir().unwrap();
    let c = write(dir.path(), "c.txt", b"same");
    let a = write(dir.path(), "a.txt", b"same");
    let b = write(dir.path(), "b.txt", b"same");
    set_mtime(&a, 3_000);
    set_mtime(&b, 1_000);
    set_mtime(&c, 2_000);

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![b, c, a]);

    let times: Vec<_> = groups[0].files.iter().map(|f| f.modified).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_extension_filter_excludes_collisions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "kept1.jpg", b"same content");
    write(dir.path(), "kept2.JPG", b"same content");
    // Byte-identical, but filtered out by suffix.
    write(dir.path(), "ignored.txt", b"same content");

    let config = WalkerConfig::default().with_extensions(vec!["jpg".into()]);
    let (groups, summary) = finder_with(config).find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.total_files, 2);
    assert!(groups
        .iter()
        .all(|g| g.files.iter().all(|f| !f.path.ends_with("ignored.txt"))));
}

#[test]
fn test_extension_filter_accepts_dotted_and_bare_suffixes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x.png", b"pixels");
    write(dir.path(), "y.png", b"pixels");

    for ext in ["png", ".png", "PNG"] {
        let config = WalkerConfig::default().with_extensions(vec![ext.to_string()]);
        let (groups, _) = finder_with(config).find_duplicates(dir.path()).unwrap();
        assert_eq!(groups.len(), 1, "extension spelling {ext:?} should match");
    }
}

#[test]
fn test_max_dirs_one_sees_only_root_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "unique.txt", b"only copy here");
    fs::create_dir(dir.path().join("sub1")).unwrap();
    fs::create_dir(dir.path().join("sub2")).unwrap();
    // The duplicate pair is split across subdirectories.
    write(&dir.path().join("sub1"), "dup.txt", b"twin");
    write(&dir.path().join("sub2"), "dup.txt", b"twin");

    let config = WalkerConfig::default().with_max_directories(Some(1));
    let (groups, summary) = finder_with(config).find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert!(summary.truncated);
    assert_eq!(summary.directories_visited, 1);
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_unbounded_scan_finds_split_duplicates() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub1")).unwrap();
    fs::create_dir(dir.path().join("sub2")).unwrap();
    write(&dir.path().join("sub1"), "dup.txt", b"twin");
    write(&dir.path().join("sub2"), "dup.txt", b"twin");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert!(!summary.truncated);
    assert_eq!(summary.directories_visited, 3);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(dir.path(), "a.bin", b"payload-1");
    write(dir.path(), "b.bin", b"payload-1");
    write(&dir.path().join("sub"), "c.bin", b"payload-1");
    write(dir.path(), "d.bin", b"payload-2");
    write(&dir.path().join("sub"), "e.bin", b"payload-2");

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.len(), second.len());
    for (g1, g2) in first.iter().zip(&second) {
        assert_eq!(g1.digest, g2.digest);
        assert_eq!(g1.size, g2.size);
        assert_eq!(g1.paths(), g2.paths());
    }
}

#[test]
fn test_three_way_duplicates_form_single_group() {
    let dir = tempdir().unwrap();
    for name in ["x1", "x2", "x3"] {
        write(dir.path(), name, b"triplet");
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.wasted_bytes, b"triplet".len() as u64 * 2);
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.directories_visited, 1);
}
