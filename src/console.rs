/// Terminal presentation of a running audit.
///
/// One `indicatif` spinner per directory scan, fed from progress snapshots,
/// replaced by a summary line when the scan finishes. All rendering state
/// lives here; the core only pushes snapshots.
use dirtally_core::audit::AuditObserver;
use dirtally_core::model::size::{bytes_to_gigabytes, format_count, format_size};
use dirtally_core::model::DirectoryOutcome;
use dirtally_core::scanner::progress::ProgressSnapshot;
use dirtally_core::AuditConfig;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg} [{elapsed}]";

pub struct ConsoleObserver<'a> {
    config: &'a AuditConfig,
    quiet: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl<'a> ConsoleObserver<'a> {
    pub fn new(config: &'a AuditConfig, quiet: bool) -> Self {
        Self {
            config,
            quiet,
            bar: Mutex::new(None),
        }
    }

    fn spinner(&self, prefix: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if self.quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_prefix(prefix);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

impl AuditObserver for ConsoleObserver<'_> {
    fn directory_started(&self, name: &str, index: usize, total: usize) {
        let pb = self.spinner(format!("[{}/{total}] {name}", index + 1));
        pb.set_message("scanning…");
        *self.bar.lock() = Some(pb);
    }

    fn progress(&self, _name: &str, snapshot: ProgressSnapshot) {
        if let Some(pb) = self.bar.lock().as_ref() {
            pb.set_message(format!(
                "{} files, {}",
                format_count(snapshot.files_found),
                format_size(snapshot.bytes_accumulated)
            ));
        }
    }

    fn directory_finished(&self, name: &str, outcome: &DirectoryOutcome) {
        if let Some(pb) = self.bar.lock().take() {
            pb.finish_and_clear();
        }
        match outcome {
            DirectoryOutcome::Scanned(result) => {
                let mut line = format!(
                    "{name}: {} in {} files",
                    format_size(result.total_bytes),
                    format_count(result.file_count)
                );
                if result.failed_probes > 0 {
                    line.push_str(&format!(" ({} unreadable)", result.failed_probes));
                }
                if !self.quiet {
                    println!("{line}");
                }
                if self.config.is_large(result.total_bytes) {
                    println!(
                        "{name} is {:.2} GB (threshold {} GB)",
                        bytes_to_gigabytes(result.total_bytes),
                        self.config.min_dir_size_gb.unwrap_or_default()
                    );
                }
            }
            DirectoryOutcome::Failed(message) => eprintln!("{name}: scan failed: {message}"),
        }
    }

    fn directory_skipped(&self, name: &str) {
        println!("{name}: skipped, no write access");
    }
}

/// Heading printed above the long-path listing. The threshold counts bytes of
/// the path as the OS stores it, not characters.
pub fn long_paths_heading(threshold: i64) -> String {
    format!("Paths over {threshold} bytes:")
}
