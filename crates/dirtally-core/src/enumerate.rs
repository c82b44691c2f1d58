/// Top-level directory enumeration.
///
/// Lists the immediate child directories of the audit root and applies the
/// ignore list and the optional name pattern. Only names are returned; the
/// caller joins them back onto the root.
use crate::error::ScanError;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Which top-level names are eligible for scanning.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    ignore: HashSet<String>,
    pattern: Option<Regex>,
}

impl DirectoryFilter {
    /// Filter that excludes the given names (exact match).
    pub fn new<I, S>(ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore: ignore.into_iter().map(Into::into).collect(),
            pattern: None,
        }
    }

    /// Additionally require names to match `pattern`, anchored at the start
    /// of the name.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{pattern})"))?);
        Ok(self)
    }

    pub fn accepts(&self, name: &str) -> bool {
        if self.ignore.contains(name) {
            return false;
        }
        self.pattern.as_ref().is_none_or(|re| re.is_match(name))
    }
}

/// List the immediate subdirectories of `root` that pass `filter`.
///
/// Links are not followed, so a link to a directory is not listed. Names
/// are returned sorted so repeated runs produce the same report order.
pub fn list_subdirectories(root: &Path, filter: &DirectoryFilter) -> Result<Vec<String>, ScanError> {
    let entries = std::fs::read_dir(root).map_err(|err| ScanError::io(root, err))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ScanError::io(root, err))?;
        let file_type = entry.file_type().map_err(|err| ScanError::io(entry.path(), err))?;
        if !file_type.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping directory with non UTF-8 name");
            continue;
        };
        if filter.accepts(&name) {
            names.push(name);
        }
    }

    names.sort_unstable();
    Ok(names)
}
