/// Size formatting utilities — human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display and export boundary.

/// Bytes in one gigabyte as the report counts it (binary, 1024³).
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Convert a byte count to (binary) gigabytes.
pub fn bytes_to_gigabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB as f64
}

/// Gigabytes with two decimals, as written to the CSV export.
pub fn format_gigabytes(gigabytes: f64) -> String {
    format!("{gigabytes:.2}")
}

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Uses binary units (KiB = 1024) but labels them with common short forms
/// (KB, MB, GB, TB) because that is what users expect in a disk tool.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
