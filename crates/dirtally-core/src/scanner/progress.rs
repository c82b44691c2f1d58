/// Scan progress reporting — lightweight snapshots pushed from the
/// coordinating scan thread to whoever renders them.
///
/// The scanner never reads anything back from a sink, so a slow or broken
/// renderer cannot influence scan results.
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Minimum wall-clock gap between two periodic snapshots.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Running totals of one scan at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// Files enumerated so far (including ones whose probe has not finished).
    pub files_found: u64,
    /// Bytes from probes that have completed so far.
    pub bytes_accumulated: u64,
    /// Time since the scan started.
    pub elapsed: Duration,
}

/// Receiver of progress snapshots.
pub trait ProgressSink {
    fn report(&self, snapshot: ProgressSnapshot);
}

impl<F: Fn(ProgressSnapshot)> ProgressSink for F {
    fn report(&self, snapshot: ProgressSnapshot) {
        self(snapshot)
    }
}

impl ProgressSink for Sender<ProgressSnapshot> {
    fn report(&self, snapshot: ProgressSnapshot) {
        // A disconnected receiver just means nobody is watching.
        let _ = self.send(snapshot);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _snapshot: ProgressSnapshot) {}
}

/// Sink that keeps every snapshot, in order. Used by tests and by callers
/// that want to inspect a scan's progress after the fact.
#[derive(Debug, Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<ProgressSnapshot>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn snapshots(&self) -> Vec<ProgressSnapshot> {
        self.snapshots.lock().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, snapshot: ProgressSnapshot) {
        self.snapshots.lock().push(snapshot);
    }
}

/// Rate limiter owned by the coordinating thread.
///
/// Periodic snapshots go out at most once per `interval`; `finish` always
/// emits regardless of timing.
#[derive(Debug)]
pub(crate) struct ProgressThrottle {
    started: Instant,
    last_emit: Instant,
    interval: Duration,
}

impl ProgressThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_emit: now,
            interval,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left until the next periodic snapshot is due.
    pub(crate) fn until_due(&self) -> Duration {
        self.interval.saturating_sub(self.last_emit.elapsed())
    }

    /// Emit a snapshot if at least one interval has passed since the last one.
    pub(crate) fn tick(&mut self, sink: &dyn ProgressSink, files_found: u64, bytes: u64) {
        if self.last_emit.elapsed() >= self.interval {
            self.emit(sink, files_found, bytes);
        }
    }

    /// Emit the final snapshot unconditionally.
    pub(crate) fn finish(&mut self, sink: &dyn ProgressSink, files_found: u64, bytes: u64) {
        self.emit(sink, files_found, bytes);
    }

    fn emit(&mut self, sink: &dyn ProgressSink, files_found: u64, bytes: u64) {
        self.last_emit = Instant::now();
        sink.report(ProgressSnapshot {
            files_found,
            bytes_accumulated: bytes,
            elapsed: self.elapsed(),
        });
    }
}
