/// Scanner module — computes the aggregate size of one directory tree.
///
/// The walk itself is serial and runs on the calling thread; only the
/// per-file size probes fan out to a worker pool. See [`parallel`] for the
/// dispatch and aggregation loop.
pub mod parallel;
pub mod progress;

use crate::error::ScanError;
use crate::model::size::bytes_to_gigabytes;
use crate::probe::FileSizeProbe;
use progress::ProgressSink;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Threshold value that turns long-path collection off.
pub const LONG_PATHS_DISABLED: i64 = -1;

/// Parameters of a single directory scan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    root: PathBuf,
    workers: NonZeroUsize,
    long_path_threshold: Option<usize>,
}

impl ScanRequest {
    /// Build a request.
    ///
    /// `long_path_threshold` is a byte length; paths strictly longer than it
    /// are collected. [`LONG_PATHS_DISABLED`] (−1) turns collection off and
    /// anything below −1 is rejected, as is a worker count of zero.
    pub fn new(
        root: impl Into<PathBuf>,
        workers: usize,
        long_path_threshold: i64,
    ) -> Result<Self, ScanError> {
        let workers = NonZeroUsize::new(workers).ok_or_else(|| {
            ScanError::InvalidRequest("worker count must be at least 1".into())
        })?;
        let long_path_threshold = match long_path_threshold {
            LONG_PATHS_DISABLED => None,
            t if t < LONG_PATHS_DISABLED => {
                return Err(ScanError::InvalidRequest(format!(
                    "long-path threshold must be -1 or non-negative, got {t}"
                )));
            }
            t => Some(usize::try_from(t).map_err(|_| {
                ScanError::InvalidRequest(format!("long-path threshold {t} is too large"))
            })?),
        };
        Ok(Self {
            root: root.into(),
            workers,
            long_path_threshold,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Whether `path` should be reported as over-long.
    pub fn exceeds_threshold(&self, path: &Path) -> bool {
        self.long_path_threshold
            .is_some_and(|limit| path.as_os_str().len() > limit)
    }
}

/// Outcome of one completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResult {
    /// Sum of all successfully probed file sizes.
    pub total_bytes: u64,
    /// Every file the walk found, including ones whose probe failed.
    pub file_count: u64,
    /// Files whose probe failed and contributed 0 bytes.
    pub failed_probes: u64,
    /// Over-threshold paths in discovery order.
    pub long_paths: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn gigabytes(&self) -> f64 {
        bytes_to_gigabytes(self.total_bytes)
    }
}

/// Scan `request.root()` and return its aggregate size.
///
/// Probe failures are absorbed (0 bytes, logged). Failure to list any
/// directory in the tree aborts the scan with an error; the worker pool is
/// fully drained before the error is returned.
pub fn scan(
    request: &ScanRequest,
    probe: &dyn FileSizeProbe,
    progress: &dyn ProgressSink,
) -> Result<ScanResult, ScanError> {
    parallel::scan_parallel(request, probe, progress)
}
