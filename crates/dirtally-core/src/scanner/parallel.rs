/// Serial walk, parallel probe.
///
/// The coordinating (calling) thread walks the tree with `jwalk` in serial
/// mode and hands every file path to a `rayon` pool sized exactly to the
/// request. Probe results come back over an unbounded `crossbeam` channel
/// and are summed by the coordinator, which is also the only thread that
/// touches the long-path list and emits progress.
///
/// # Pool lifetime
///
/// A fresh pool is built per scan. All probe tasks are spawned inside
/// `ThreadPool::in_place_scope`, which does not return until every spawned
/// task has finished. That holds on the error path too: when the walk fails
/// half-way the `?` leaves the scope closure, the scope waits for in-flight
/// probes, and only then does the error reach the caller. A directory that
/// cannot be listed, the root included, fails the walk the same way. The
/// pool is dropped (threads stopped) when this function returns.
use crate::error::ScanError;
use crate::probe::{log_failure, FileSizeProbe};
use crate::scanner::progress::{ProgressSink, ProgressThrottle, PROGRESS_INTERVAL};
use crate::scanner::{ScanRequest, ScanResult};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::path::PathBuf;
use tracing::debug;

/// What a single probe task sends back.
enum ProbeOutcome {
    Sized(u64),
    Failed,
}

/// Running totals owned by the coordinating thread.
#[derive(Default)]
struct Tally {
    files_found: u64,
    bytes: u64,
    failed: u64,
}

impl Tally {
    fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Sized(size) => self.bytes = self.bytes.saturating_add(size),
            ProbeOutcome::Failed => self.failed += 1,
        }
    }

    /// Fold in whatever results have already arrived, without waiting.
    fn absorb_ready(&mut self, results: &Receiver<ProbeOutcome>) {
        while let Ok(outcome) = results.try_recv() {
            self.record(outcome);
        }
    }
}

/// Scan one directory tree. See the module docs for the threading model.
pub fn scan_parallel(
    request: &ScanRequest,
    probe: &dyn FileSizeProbe,
    progress: &dyn ProgressSink,
) -> Result<ScanResult, ScanError> {
    let root = request.root();
    let meta = std::fs::metadata(root).map_err(|err| ScanError::io(root, err))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.workers())
        .thread_name(|i| format!("dirtally-probe-{i}"))
        .build()?;

    let mut throttle = ProgressThrottle::new(PROGRESS_INTERVAL);
    let mut tally = Tally::default();
    let mut long_paths: Vec<PathBuf> = Vec::new();

    pool.in_place_scope(|scope| -> Result<(), ScanError> {
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<ProbeOutcome>();

        let walker = jwalk::WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(jwalk::Parallelism::Serial);

        for entry in walker {
            let mut entry = entry.map_err(|err| ScanError::from_walk(root, err))?;
            // jwalk reports a directory it could not list on that directory's
            // own entry rather than as an `Err` item.
            if let Some(err) = entry.read_children_error.take() {
                return Err(ScanError::from_walk(root, err));
            }
            tally.absorb_ready(&result_rx);

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            let path = entry.path();
            // Links are not descended, but a link to a directory is not a file either.
            if file_type.is_symlink() && path.is_dir() {
                continue;
            }

            tally.files_found += 1;
            if request.exceeds_threshold(&path) {
                long_paths.push(path.clone());
            }

            let tx = result_tx.clone();
            scope.spawn(move |_| {
                let outcome = match probe.try_probe(&path) {
                    Ok(size) => ProbeOutcome::Sized(size),
                    Err(err) => {
                        log_failure(&path, &err);
                        ProbeOutcome::Failed
                    }
                };
                // The receiver is gone only if the walk already failed.
                let _ = tx.send(outcome);
            });

            throttle.tick(progress, tally.files_found, tally.bytes);
        }

        // Every task holds its own sender clone; once ours is gone the channel
        // disconnects exactly when the last task has reported (or panicked).
        drop(result_tx);
        drain(&result_rx, &mut tally, &mut throttle, progress);
        Ok(())
    })?;

    throttle.finish(progress, tally.files_found, tally.bytes);

    let elapsed = throttle.elapsed();
    debug!(
        root = %root.display(),
        files = tally.files_found,
        bytes = tally.bytes,
        failed = tally.failed,
        workers = request.workers(),
        "scan complete in {elapsed:?}"
    );

    Ok(ScanResult {
        total_bytes: tally.bytes,
        file_count: tally.files_found,
        failed_probes: tally.failed,
        long_paths,
        elapsed,
    })
}

/// Wait for all outstanding probes, still emitting periodic progress.
fn drain(
    results: &Receiver<ProbeOutcome>,
    tally: &mut Tally,
    throttle: &mut ProgressThrottle,
    progress: &dyn ProgressSink,
) {
    loop {
        match results.recv_timeout(throttle.until_due()) {
            Ok(outcome) => tally.record(outcome),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }
        throttle.tick(progress, tally.files_found, tally.bytes);
    }
}
