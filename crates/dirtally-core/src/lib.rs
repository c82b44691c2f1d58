/// dirtally core — directory size auditing engine.
///
/// This crate contains all business logic with zero terminal dependencies.
/// The binary only parses arguments, sets up logging and renders progress.
///
/// # Modules
///
/// - [`scanner`] — serial walk with pooled, fail-soft size probes.
/// - [`probe`] — per-file size lookup.
/// - [`enumerate`] — top-level subdirectory listing and filtering.
/// - [`platform`] — write-access probe.
/// - [`report`] — CSV export.
/// - [`config`] — INI configuration.
/// - [`audit`] — runs a whole audit from a config.
/// - [`model`] — report rows and size formatting.
pub mod audit;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod platform;
pub mod probe;
pub mod report;
pub mod scanner;

pub use audit::{AuditObserver, AuditSummary, Auditor, SilentObserver};
pub use config::AuditConfig;
pub use error::{ConfigError, ReportError, ScanError};
pub use probe::{FileSizeProbe, MetadataProbe};
pub use scanner::{scan, ScanRequest, ScanResult};
