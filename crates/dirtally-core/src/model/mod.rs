/// Data model for audit results.
///
/// Re-exports report rows, per-directory outcomes and size formatting.
pub mod row;
pub mod size;

pub use row::{DirectoryOutcome, DirectoryReportRow};
