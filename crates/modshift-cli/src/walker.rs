//! Collecting the source files a command runs over.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::ModshiftConfig;
use crate::error::{CliError, Result};

/// Which files under a root are picked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    /// Extensions without the dot
    pub extensions: Vec<String>,
    /// Directory names that are skipped along with their contents
    pub exclude_dirs: Vec<String>,
    /// When non-empty, a file's path must end with one of these
    pub suffixes: Vec<String>,
}

impl FileFilter {
    pub fn from_config(config: &ModshiftConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            suffixes: Vec::new(),
        }
    }

    /// `ext` and its markup variant (`ts` and `tsx`, `js` and `jsx`)
    pub fn with_extension_family(mut self, ext: &str) -> Self {
        let ext = ext.trim_start_matches('.');
        self.extensions = vec![ext.to_string(), format!("{ext}x")];
        self
    }

    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes.into_iter().filter(|s| !s.is_empty()).collect();
        self
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.exclude_dirs.iter().any(|dir| *dir == name)
    }

    fn includes(&self, path: &Path) -> bool {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let by_extension = self
            .extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}")));
        let by_suffix = self.suffixes.is_empty() || {
            let path = path.to_string_lossy();
            self.suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
        };
        by_extension && by_suffix
    }
}

/// Files to process under `root`, sorted by path.
///
/// A root that is a file is returned as is, whatever its extension.
pub fn collect_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(CliError::PathNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !filter.is_excluded_dir(entry));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && filter.includes(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
