/// Audit orchestration — one scan per qualifying top-level directory.
///
/// The auditor lists the root's subdirectories, optionally gates each on
/// write access, scans the survivors one after another and folds the
/// outcomes into an [`AuditSummary`]. A failed scan becomes a name-only row
/// and the run moves on; only failing to list the root itself is fatal.
use crate::config::AuditConfig;
use crate::enumerate::list_subdirectories;
use crate::error::ScanError;
use crate::model::{DirectoryOutcome, DirectoryReportRow};
use crate::platform::{MarkerFileProbe, WriteAccessProbe};
use crate::probe::{FileSizeProbe, MetadataProbe};
use crate::scanner::progress::ProgressSnapshot;
use crate::scanner::{self, ScanRequest};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Callbacks for presenting an audit while it runs. All methods default to
/// doing nothing.
pub trait AuditObserver {
    /// A scan of `name` is about to start; `index` is zero-based out of `total`.
    fn directory_started(&self, _name: &str, _index: usize, _total: usize) {}
    fn progress(&self, _name: &str, _snapshot: ProgressSnapshot) {}
    fn directory_finished(&self, _name: &str, _outcome: &DirectoryOutcome) {}
    /// `name` failed the write-access check and will not be scanned.
    fn directory_skipped(&self, _name: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl AuditObserver for SilentObserver {}

/// A directory at or above the configured size threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LargeDirectory {
    pub name: String,
    pub bytes: u64,
}

/// Everything an audit produced, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub rows: Vec<DirectoryReportRow>,
    pub large_directories: Vec<LargeDirectory>,
    pub long_paths: Vec<PathBuf>,
    pub skipped_unwritable: Vec<String>,
    /// `(name, error message)` for each scan that failed.
    pub failed: Vec<(String, String)>,
}

impl AuditSummary {
    fn record(
        &mut self,
        config: &AuditConfig,
        name: &str,
        outcome: DirectoryOutcome,
        write_access: Option<bool>,
    ) {
        self.rows
            .push(DirectoryReportRow::from_outcome(name, &outcome, write_access));
        match outcome {
            DirectoryOutcome::Scanned(result) => {
                if config.is_large(result.total_bytes) {
                    self.large_directories.push(LargeDirectory {
                        name: name.to_string(),
                        bytes: result.total_bytes,
                    });
                }
                self.long_paths.extend(result.long_paths);
            }
            DirectoryOutcome::Failed(message) => self.failed.push((name.to_string(), message)),
        }
    }
}

/// Drives a full audit from an [`AuditConfig`].
pub struct Auditor {
    config: AuditConfig,
    size_probe: Box<dyn FileSizeProbe>,
    write_probe: Box<dyn WriteAccessProbe>,
}

impl Auditor {
    /// Auditor using the real filesystem probes.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            size_probe: Box::new(MetadataProbe),
            write_probe: Box::new(MarkerFileProbe),
        }
    }

    pub fn with_size_probe(mut self, probe: impl FileSizeProbe + 'static) -> Self {
        self.size_probe = Box::new(probe);
        self
    }

    pub fn with_write_probe(mut self, probe: impl WriteAccessProbe + 'static) -> Self {
        self.write_probe = Box::new(probe);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the audit. Fails only if the root itself cannot be listed.
    pub fn run(&self, observer: &dyn AuditObserver) -> Result<AuditSummary, ScanError> {
        let root = &self.config.root_directory;
        let names = list_subdirectories(root, self.config.filter())?;
        info!(root = %root.display(), directories = names.len(), "starting audit");

        let mut summary = AuditSummary::default();
        for (index, name) in names.iter().enumerate() {
            let dir = root.join(name);

            let write_access = if self.config.check_for_write_access {
                if !self.write_probe.is_writable(&dir) {
                    info!(directory = %name, "not writable, skipping");
                    observer.directory_skipped(name);
                    summary.skipped_unwritable.push(name.clone());
                    continue;
                }
                Some(true)
            } else {
                None
            };

            observer.directory_started(name, index, names.len());
            let outcome = self.scan_directory(&dir, name, observer);
            observer.directory_finished(name, &outcome);
            summary.record(&self.config, name, outcome, write_access);
        }

        info!(
            scanned = summary.rows.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped_unwritable.len(),
            "audit complete"
        );
        Ok(summary)
    }

    fn scan_directory(&self, dir: &Path, name: &str, observer: &dyn AuditObserver) -> DirectoryOutcome {
        let sink = |snapshot: ProgressSnapshot| observer.progress(name, snapshot);
        let result = ScanRequest::new(dir, self.config.num_threads, self.config.paths_over_len)
            .and_then(|request| scanner::scan(&request, self.size_probe.as_ref(), &sink));

        match result {
            Ok(result) => DirectoryOutcome::Scanned(result),
            Err(err) => {
                error!(directory = %dir.display(), error = %err, "scan failed");
                DirectoryOutcome::Failed(err.to_string())
            }
        }
    }
}
