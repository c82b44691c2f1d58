/// Write-access checks.
///
/// The only portable way to know whether a directory is writable by this
/// process is to try: create a uniquely named marker file inside it and
/// remove it again. The marker is held by a `tempfile` guard, so it is
/// deleted on every exit path once creation succeeded.
use std::path::Path;
use tracing::debug;

/// Prefix of the marker files created by [`MarkerFileProbe`].
pub const MARKER_PREFIX: &str = ".dirtally-write-probe-";

/// Decides whether a directory is writable.
pub trait WriteAccessProbe {
    fn is_writable(&self, dir: &Path) -> bool;
}

/// Probe that creates and deletes a marker file.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerFileProbe;

impl WriteAccessProbe for MarkerFileProbe {
    fn is_writable(&self, dir: &Path) -> bool {
        let marker = tempfile::Builder::new()
            .prefix(MARKER_PREFIX)
            .tempfile_in(dir);
        match marker {
            Ok(file) => {
                // Close explicitly so a failed removal is at least logged.
                if let Err(err) = file.close() {
                    debug!(dir = %dir.display(), error = %err, "failed to remove write marker");
                }
                true
            }
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "directory is not writable");
                false
            }
        }
    }
}

impl<F: Fn(&Path) -> bool> WriteAccessProbe for F {
    fn is_writable(&self, dir: &Path) -> bool {
        self(dir)
    }
}
