/// Per-file size lookup.
///
/// A probe is the only piece of the scanner that touches file metadata,
/// and it runs on worker threads. It must never fail its caller: a file that
/// vanished, a dangling link or a permission error all count as 0 bytes and
/// are written to the diagnostic log.
use std::io;
use std::path::Path;
use tracing::warn;

/// Size lookup for a single file path.
///
/// Implementors only provide [`try_probe`](FileSizeProbe::try_probe); the
/// fail-soft [`probe`](FileSizeProbe::probe) is derived from it.
pub trait FileSizeProbe: Send + Sync {
    /// Look up the size of `path` in bytes.
    fn try_probe(&self, path: &Path) -> io::Result<u64>;

    /// Look up the size of `path`, logging any failure and returning 0.
    fn probe(&self, path: &Path) -> u64 {
        self.try_probe(path).unwrap_or_else(|err| {
            log_failure(path, &err);
            0
        })
    }
}

/// Record a failed probe in the diagnostic log.
pub(crate) fn log_failure(path: &Path, err: &io::Error) {
    warn!(
        target: "dirtally::probe",
        path = %path.display(),
        error = %err,
        "size probe failed"
    );
}

/// Probe backed by `std::fs::metadata`.
///
/// Links are followed, so the size reported for a link is the size of its
/// target and a dangling link is a probe failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataProbe;

impl FileSizeProbe for MetadataProbe {
    fn try_probe(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}

impl<P: FileSizeProbe + ?Sized> FileSizeProbe for &P {
    fn try_probe(&self, path: &Path) -> io::Result<u64> {
        (**self).try_probe(path)
    }
}

impl<P: FileSizeProbe + ?Sized> FileSizeProbe for std::sync::Arc<P> {
    fn try_probe(&self, path: &Path) -> io::Result<u64> {
        (**self).try_probe(path)
    }
}
