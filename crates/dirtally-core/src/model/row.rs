/// Per-directory audit results and the report rows built from them.
use crate::model::size::bytes_to_gigabytes;
use crate::scanner::ScanResult;
use compact_str::CompactString;

/// What happened to one top-level subdirectory.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryOutcome {
    /// The scan ran to completion.
    Scanned(ScanResult),
    /// The walk failed; carries the error message.
    Failed(String),
}

/// One line of the CSV export.
///
/// Every field except `name` is optional: a failed scan leaves the size
/// fields empty, and `write_access` is only known when the check ran. Which
/// fields are actually written is decided by the report's column set.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryReportRow {
    pub name: CompactString,
    pub bytes: Option<u64>,
    pub gigabytes: Option<f64>,
    pub file_count: Option<u64>,
    pub write_access: Option<bool>,
}

impl DirectoryReportRow {
    /// Row for a directory whose scan succeeded.
    pub fn scanned(name: &str, result: &ScanResult, write_access: Option<bool>) -> Self {
        Self {
            name: CompactString::new(name),
            bytes: Some(result.total_bytes),
            gigabytes: Some(bytes_to_gigabytes(result.total_bytes)),
            file_count: Some(result.file_count),
            write_access,
        }
    }

    /// Row for a directory whose scan failed: name only.
    pub fn failed(name: &str, write_access: Option<bool>) -> Self {
        Self {
            name: CompactString::new(name),
            bytes: None,
            gigabytes: None,
            file_count: None,
            write_access,
        }
    }

    pub fn from_outcome(name: &str, outcome: &DirectoryOutcome, write_access: Option<bool>) -> Self {
        match outcome {
            DirectoryOutcome::Scanned(result) => Self::scanned(name, result, write_access),
            DirectoryOutcome::Failed(_) => Self::failed(name, write_access),
        }
    }
}
