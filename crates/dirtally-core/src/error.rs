/// Error taxonomy for auditing runs.
///
/// Per-file probe failures never surface here; they are absorbed by the
/// probe and logged. Everything in this module is fatal to *something*:
/// a single subdirectory scan, the whole run, or the report export.
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort one scan (or the top-level enumeration).
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A directory inside the tree could not be listed.
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The scan root exists but is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Any other I/O failure while walking.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request parameters are out of range.
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    /// Classify an I/O error by kind, keeping the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Convert a walker error into a scan error.
    ///
    /// `jwalk` errors carry an optional path and an optional underlying
    /// `io::Error`. Without a path the error is attributed to the scan root.
    pub(crate) fn from_walk(root: &std::path::Path, err: jwalk::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let source = match err.io_error() {
            Some(io) => std::io::Error::new(io.kind(), err.to_string()),
            None => std::io::Error::other(err.to_string()),
        };
        Self::io(path, source)
    }
}

/// Errors raised while loading the INI configuration.
///
/// Every variant names the offending key or file so the operator can fix
/// the config without guessing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("failed to load config {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// A required section is absent.
    #[error("missing section [{0}]")]
    MissingSection(String),

    /// A required key is absent or empty.
    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// A key is present but its value cannot be used.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Failure to write the CSV export.
#[derive(Debug, Error)]
#[error("failed to write report {}: {source}", path.display())]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: csv::Error,
}
