/// End-to-end scanner integration tests.
///
/// These tests run the real `scanner::scan` against temporary directory
/// trees: real worker pools, real `jwalk` traversal, real metadata calls.
/// Only the size probe is swapped out where a test needs a failure at a
/// known path.
use dirtally_core::scanner::progress::{ProgressSink, ProgressSnapshot, RecordingSink};
use dirtally_core::scanner::{scan, ScanRequest};
use dirtally_core::{FileSizeProbe, MetadataProbe, ScanError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for scanner tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt   (100 bytes)
///     b.rs    (200 bytes)
///   beta/
///     c.png   (300 bytes)
///     deep/
///       e.log (500 bytes)
///   d.zip     (400 bytes)
///   .hidden   (50 bytes)
/// ```
///
/// Total file bytes: 1 550 across 6 files.
fn build_test_tree(root: &Path) {
    let alpha = root.join("alpha");
    let deep = root.join("beta").join("deep");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&deep).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&root.join("beta").join("c.png"), 300);
    write_bytes(&deep.join("e.log"), 500);
    write_bytes(&root.join("d.zip"), 400);
    write_bytes(&root.join(".hidden"), 50);
}

fn write_bytes(path: &Path, n: usize) {
    fs::write(path, vec![0u8; n]).unwrap();
}

/// Metadata probe that fails for one specific path.
struct FailingAt(PathBuf);

impl FileSizeProbe for FailingAt {
    fn try_probe(&self, path: &Path) -> io::Result<u64> {
        if path == self.0 {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"))
        } else {
            MetadataProbe.try_probe(path)
        }
    }
}

/// Nest directories until the innermost one's path is longer than
/// `PATH_MAX`, so listing it fails for every user, root included. Each level
/// is built under a short name and renamed into a fresh parent.
#[cfg(unix)]
fn nest_past_path_max(parent: &Path, name: &str) {
    let segment = "n".repeat(200);
    let depth = 24;
    let mut current = parent.join(".nest0");
    fs::create_dir(&current).unwrap();
    for level in 1..=depth {
        let outer = if level == depth {
            parent.join(name)
        } else {
            parent.join(format!(".nest{level}"))
        };
        fs::create_dir(&outer).unwrap();
        fs::rename(&current, outer.join(&segment)).unwrap();
        current = outer;
    }
}

fn request(root: &Path, workers: usize) -> ScanRequest {
    ScanRequest::new(root, workers, -1).unwrap()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The scanner must visit every file, hidden ones included.
#[test]
fn scan_discovers_all_files() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());

    let result = scan(&request(tmp.path(), 4), &MetadataProbe, &RecordingSink::new()).unwrap();

    assert_eq!(result.file_count, 6);
    assert_eq!(result.total_bytes, 1_550);
    assert_eq!(result.failed_probes, 0);
}

/// A probe failure contributes 0 bytes but the file is still counted.
#[test]
fn failed_probe_is_excluded_from_total_only() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    let probe = FailingAt(tmp.path().join("beta").join("c.png"));

    let result = scan(&request(tmp.path(), 2), &probe, &RecordingSink::new()).unwrap();

    assert_eq!(result.file_count, 6);
    assert_eq!(result.total_bytes, 1_250);
    assert_eq!(result.failed_probes, 1);
}

/// The result does not depend on how many workers probe sizes.
#[test]
fn worker_count_does_not_change_result() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    for i in 0..200 {
        write_bytes(&tmp.path().join("alpha").join(format!("bulk{i:03}.bin")), i);
    }

    let baseline = scan(&request(tmp.path(), 1), &MetadataProbe, &RecordingSink::new()).unwrap();
    for workers in [2, 3, 8, 32] {
        let result =
            scan(&request(tmp.path(), workers), &MetadataProbe, &RecordingSink::new()).unwrap();
        assert_eq!(result.total_bytes, baseline.total_bytes, "workers = {workers}");
        assert_eq!(result.file_count, baseline.file_count, "workers = {workers}");
    }
    assert_eq!(baseline.file_count, 206);
    assert_eq!(baseline.total_bytes, 1_550 + (0..200).sum::<u64>());
}

/// Long-path collection: length T+1 is in, length T is out, −1 disables.
#[test]
fn long_path_threshold_boundary() {
    let tmp = TempDir::new().unwrap();
    let at_limit = tmp.path().join("abcd");
    let over_limit = tmp.path().join("abcde");
    write_bytes(&at_limit, 1);
    write_bytes(&over_limit, 1);

    let threshold = at_limit.as_os_str().len() as i64;
    let req = ScanRequest::new(tmp.path(), 2, threshold).unwrap();
    let result = scan(&req, &MetadataProbe, &RecordingSink::new()).unwrap();
    assert_eq!(result.long_paths, vec![over_limit.clone()]);

    let req = ScanRequest::new(tmp.path(), 2, 0).unwrap();
    let result = scan(&req, &MetadataProbe, &RecordingSink::new()).unwrap();
    assert_eq!(result.long_paths.len(), 2);

    let req = ScanRequest::new(tmp.path(), 2, -1).unwrap();
    let result = scan(&req, &MetadataProbe, &RecordingSink::new()).unwrap();
    assert!(result.long_paths.is_empty());
}

/// Progress snapshots never go backwards and always end with the final totals.
#[test]
fn progress_is_monotonic_and_final() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    let sink = RecordingSink::new();

    let result = scan(&request(tmp.path(), 3), &MetadataProbe, &sink).unwrap();

    let snaps = sink.snapshots();
    assert!(!snaps.is_empty());
    for pair in snaps.windows(2) {
        assert!(pair[0].files_found <= pair[1].files_found);
        assert!(pair[0].bytes_accumulated <= pair[1].bytes_accumulated);
        assert!(pair[0].elapsed <= pair[1].elapsed);
    }
    let last = snaps.last().unwrap();
    assert_eq!(last.files_found, result.file_count);
    assert_eq!(last.bytes_accumulated, result.total_bytes);
}

/// Slow probes keep the drain loop busy long enough for a periodic snapshot.
#[test]
fn progress_is_reported_while_draining() {
    struct SlowProbe;

    impl FileSizeProbe for SlowProbe {
        fn try_probe(&self, path: &Path) -> io::Result<u64> {
            std::thread::sleep(std::time::Duration::from_millis(400));
            MetadataProbe.try_probe(path)
        }
    }

    let tmp = TempDir::new().unwrap();
    for i in 0..4 {
        write_bytes(&tmp.path().join(format!("f{i}")), 10);
    }
    let sink = RecordingSink::new();

    // One worker, four 400 ms probes: at least one periodic snapshot before the final one.
    let result = scan(&request(tmp.path(), 1), &SlowProbe, &sink).unwrap();

    assert_eq!(result.total_bytes, 40);
    assert!(sink.snapshots().len() >= 2);
}

/// Snapshots can also be consumed from another thread through a channel.
#[test]
fn channel_sink_receives_final_snapshot() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    let (tx, rx) = crossbeam_channel::unbounded::<ProgressSnapshot>();

    scan(&request(tmp.path(), 2), &MetadataProbe, &tx as &dyn ProgressSink).unwrap();
    drop(tx);

    let last = rx.iter().last().expect("at least one snapshot");
    assert_eq!(last.files_found, 6);
    assert_eq!(last.bytes_accumulated, 1_550);
}

/// Scans of an empty directory succeed with zero totals.
#[test]
fn scan_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let result = scan(&request(tmp.path(), 1), &MetadataProbe, &RecordingSink::new()).unwrap();
    assert_eq!(result.file_count, 0);
    assert_eq!(result.total_bytes, 0);
}

/// A subdirectory that cannot be listed aborts the scan instead of being
/// silently skipped. Path length makes the listing fail regardless of the
/// user the tests run as.
#[cfg(unix)]
#[test]
fn unlistable_subdirectory_is_fatal() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    nest_past_path_max(&tmp.path().join("beta"), "chain");

    let err = scan(&request(tmp.path(), 2), &MetadataProbe, &RecordingSink::new()).unwrap_err();
    assert!(matches!(err, ScanError::Io { .. }), "got {err:?}");
}

/// Same failure through permission bits.
#[cfg(unix)]
#[test]
#[ignore = "root bypasses permission bits; run as a regular user with --ignored"]
fn unreadable_subdirectory_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    let locked = tmp.path().join("alpha");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let listable = fs::read_dir(&locked).is_ok();
    let outcome = scan(&request(tmp.path(), 2), &MetadataProbe, &RecordingSink::new());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(!listable, "permission bits were not enforced; run as a regular user");
    assert!(
        matches!(outcome, Err(ScanError::PermissionDenied { .. })),
        "got {outcome:?}"
    );
}

/// An unreadable root passes the existence check but still fails the walk.
#[cfg(unix)]
#[test]
#[ignore = "root bypasses permission bits; run as a regular user with --ignored"]
fn unreadable_root_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir(&root).unwrap();
    build_test_tree(&root);
    fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

    let listable = fs::read_dir(&root).is_ok();
    let outcome = scan(&request(&root, 2), &MetadataProbe, &RecordingSink::new());
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(!listable, "permission bits were not enforced; run as a regular user");
    assert!(
        matches!(outcome, Err(ScanError::PermissionDenied { .. })),
        "got {outcome:?}"
    );
}
