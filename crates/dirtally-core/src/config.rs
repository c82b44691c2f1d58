/// INI configuration for an audit run.
///
/// Everything lives in the `[Directories]` section:
///
/// ```ini
/// [Directories]
/// root_directory = /srv/home
/// ignore_directories = lost+found, .snapshot
/// top_level_regex = ^user
/// check_for_write_access = true
/// min_dir_size = 10
/// bytes = true
/// gigabytes = true
/// filecount = true
/// csv_file = directory_sizes.csv
/// paths_over_len = 255
/// num_threads = 16
/// log_file = dirtally.log
/// ```
///
/// Only `root_directory` is required. Empty values count as absent.
use crate::enumerate::DirectoryFilter;
use crate::error::ConfigError;
use crate::report::ReportColumns;
use crate::scanner::LONG_PATHS_DISABLED;
use ini::{Ini, ParseOption, Properties};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SECTION: &str = "Directories";
pub const DEFAULT_CSV_FILE: &str = "directory_sizes.csv";
pub const DEFAULT_LOG_FILE: &str = "dirtally.log";

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub root_directory: PathBuf,
    pub ignore_directories: Vec<String>,
    pub top_level_regex: Option<String>,
    pub check_for_write_access: bool,
    /// Directories at or above this many GB are echoed to the console.
    pub min_dir_size_gb: Option<f64>,
    pub columns: ReportColumns,
    pub csv_file: PathBuf,
    /// −1 disables long-path collection.
    pub paths_over_len: i64,
    pub num_threads: usize,
    pub log_file: PathBuf,
    filter: DirectoryFilter,
}

impl AuditConfig {
    /// Defaults for everything except the root.
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
            ignore_directories: Vec::new(),
            top_level_regex: None,
            check_for_write_access: false,
            min_dir_size_gb: None,
            columns: ReportColumns::default(),
            csv_file: PathBuf::from(DEFAULT_CSV_FILE),
            paths_over_len: LONG_PATHS_DISABLED,
            num_threads: num_cpus::get().max(1),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            filter: DirectoryFilter::default(),
        }
    }

    /// Replace the ignore list and name pattern, recompiling the filter.
    pub fn with_filter(
        mut self,
        ignore_directories: Vec<String>,
        top_level_regex: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut filter = DirectoryFilter::new(ignore_directories.iter().cloned());
        if let Some(pattern) = &top_level_regex {
            filter = filter
                .with_pattern(pattern)
                .map_err(|err| invalid("top_level_regex", pattern, err.to_string()))?;
        }
        self.ignore_directories = ignore_directories;
        self.top_level_regex = top_level_regex;
        self.filter = filter;
        Ok(self)
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file_opt(path, parse_options()).map_err(|err| ConfigError::Load {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse config text (used by tests and embedders).
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(text, parse_options()).map_err(|err| ConfigError::Load {
            path: PathBuf::from("<string>"),
            message: err.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let props = ini
            .section(Some(SECTION))
            .ok_or_else(|| ConfigError::MissingSection(SECTION.into()))?;

        let root = value(props, "root_directory").ok_or_else(|| ConfigError::MissingKey {
            section: SECTION.into(),
            key: "root_directory".into(),
        })?;
        let mut config = Self::new(root);

        let ignore = value(props, "ignore_directories")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let pattern = value(props, "top_level_regex").map(String::from);
        config = config.with_filter(ignore, pattern)?;

        if let Some(flag) = parse_bool(props, "check_for_write_access")? {
            config.check_for_write_access = flag;
            config.columns.write_access = flag;
        }
        if let Some(flag) = parse_bool(props, "bytes")? {
            config.columns.bytes = flag;
        }
        if let Some(flag) = parse_bool(props, "gigabytes")? {
            config.columns.gigabytes = flag;
        }
        if let Some(flag) = parse_bool(props, "filecount")? {
            config.columns.file_count = flag;
        }

        if let Some(gb) = parse_num::<f64>(props, "min_dir_size")? {
            if !gb.is_finite() || gb < 0.0 {
                return Err(invalid("min_dir_size", &gb.to_string(), "expected a non-negative number"));
            }
            config.min_dir_size_gb = Some(gb);
        }
        if let Some(threshold) = parse_num::<i64>(props, "paths_over_len")? {
            if threshold < LONG_PATHS_DISABLED {
                return Err(invalid(
                    "paths_over_len",
                    &threshold.to_string(),
                    "expected -1 or a non-negative length",
                ));
            }
            config.paths_over_len = threshold;
        }
        if let Some(threads) = parse_num::<usize>(props, "num_threads")? {
            if threads == 0 {
                return Err(invalid("num_threads", "0", "expected at least 1"));
            }
            config.num_threads = threads;
        }
        if let Some(path) = value(props, "csv_file") {
            config.csv_file = PathBuf::from(path);
        }
        if let Some(path) = value(props, "log_file") {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Whether a directory of `bytes` should be echoed as large.
    ///
    /// Inclusive: a directory exactly at the threshold counts.
    pub fn is_large(&self, bytes: u64) -> bool {
        self.min_dir_size_gb
            .is_some_and(|min| crate::model::size::bytes_to_gigabytes(bytes) >= min)
    }
}

/// Backslash escapes are off so Windows paths survive as written.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn value<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        value: value.into(),
        reason: reason.into(),
    }
}

fn parse_bool(props: &Properties, key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = value(props, key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Some(true)),
        "false" | "no" | "off" | "0" => Ok(Some(false)),
        _ => Err(invalid(key, raw, "expected a boolean (true/false)")),
    }
}

fn parse_num<T: FromStr>(props: &Properties, key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = value(props, key) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|err| invalid(key, raw, err.to_string()))
}
