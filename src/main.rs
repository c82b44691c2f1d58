//! dirtally — audits disk usage of the top-level directories under a root.
//!
//! Thin binary entry point. All scanning, configuration and reporting logic
//! lives in the `dirtally-core` crate.

mod cli;
mod console;

use anyhow::Context;
use clap::Parser;
use dirtally_core::report::write_report;
use dirtally_core::{AuditConfig, Auditor};
use std::fs::File;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Config problems are fatal before anything else happens, including logging.
    let config = AuditConfig::load(&cli.config)
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;

    // Initialise structured logging into the diagnostic log file.
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("cannot create log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();

    tracing::info!(config = %cli.config.display(), threads = config.num_threads, "dirtally starting");

    let auditor = Auditor::new(config);
    let config = auditor.config();
    let observer = console::ConsoleObserver::new(config, cli.quiet);
    let summary = auditor
        .run(&observer)
        .with_context(|| format!("cannot list {}", config.root_directory.display()))?;

    if !summary.long_paths.is_empty() {
        println!();
        println!("{}", console::long_paths_heading(config.paths_over_len));
        for path in &summary.long_paths {
            println!("  {}", path.display());
        }
    }
    if !summary.failed.is_empty() {
        println!();
        println!("Scans that failed (details in {}):", config.log_file.display());
        for (name, message) in &summary.failed {
            println!("  {name}: {message}");
        }
    }

    write_report(&summary.rows, config.columns, &config.csv_file)?;
    println!("Directory list exported to {}", config.csv_file.display());

    Ok(())
}
