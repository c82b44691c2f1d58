/// CSV export of per-directory results.
///
/// The header always starts with `Directory`; every other column is
/// switched on or off by [`ReportColumns`], and each data row carries
/// exactly the same subset as the header.
use crate::error::ReportError;
use crate::model::size::format_gigabytes;
use crate::model::DirectoryReportRow;
use std::io;
use std::path::Path;

/// Which optional columns the export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportColumns {
    pub bytes: bool,
    pub gigabytes: bool,
    pub file_count: bool,
    pub write_access: bool,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            bytes: true,
            gigabytes: true,
            file_count: true,
            write_access: false,
        }
    }
}

impl ReportColumns {
    /// Header labels for the enabled columns.
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["Directory"];
        if self.bytes {
            header.push("Size (bytes)");
        }
        if self.gigabytes {
            header.push("Size (GB)");
        }
        if self.file_count {
            header.push("File Count");
        }
        if self.write_access {
            header.push("Write Access");
        }
        header
    }

    /// Field values for one row; unknown values become empty fields.
    pub fn record(&self, row: &DirectoryReportRow) -> Vec<String> {
        fn field<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
            value.map(render).unwrap_or_default()
        }

        let mut record = vec![row.name.to_string()];
        if self.bytes {
            record.push(field(row.bytes, |b| b.to_string()));
        }
        if self.gigabytes {
            record.push(field(row.gigabytes, format_gigabytes));
        }
        if self.file_count {
            record.push(field(row.file_count, |n| n.to_string()));
        }
        if self.write_access {
            record.push(field(row.write_access, |w| w.to_string()));
        }
        record
    }
}

/// CSV report writer for a fixed column set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReport {
    columns: ReportColumns,
}

impl CsvReport {
    pub fn new(columns: ReportColumns) -> Self {
        Self { columns }
    }

    /// Write `rows` to the file at `destination`, replacing it.
    pub fn write(&self, rows: &[DirectoryReportRow], destination: &Path) -> Result<(), ReportError> {
        let file = std::fs::File::create(destination).map_err(|err| ReportError {
            path: destination.to_path_buf(),
            source: err.into(),
        })?;
        self.write_to(rows, file).map_err(|source| ReportError {
            path: destination.to_path_buf(),
            source,
        })
    }

    /// Write `rows` to any writer.
    pub fn write_to<W: io::Write>(&self, rows: &[DirectoryReportRow], writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.columns.header())?;
        for row in rows {
            out.write_record(self.columns.record(row))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Convenience wrapper: write `rows` with `columns` to `destination`.
pub fn write_report(
    rows: &[DirectoryReportRow],
    columns: ReportColumns,
    destination: &Path,
) -> Result<(), ReportError> {
    CsvReport::new(columns).write(rows, destination)
}
