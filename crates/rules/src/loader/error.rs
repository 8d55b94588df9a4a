//! Error types and load report structures for the rule loader.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where a rule record came from: file plus 1-based record index.
///
/// For line-delimited files `record` is the line number; for YAML files it
/// is the document index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    pub file: PathBuf,
    pub record: usize,
}

impl RecordLocation {
    pub fn new(file: impl Into<PathBuf>, record: usize) -> Self {
        Self {
            file: file.into(),
            record,
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.record)
    }
}

/// Errors that can occur while loading a rule set.
///
/// A load either produces a complete rule set or one of these; a malformed
/// record never silently drops out.
#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Filesystem I/O error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record that could not be decoded into a rule.
    #[error("parse error at {location}: {message}")]
    Parse {
        location: RecordLocation,
        message: String,
    },

    /// A decoded rule that failed validation.
    #[error("invalid rule at {location}: {message}")]
    Invalid {
        location: RecordLocation,
        message: String,
    },

    #[error("duplicate rule id: {id} (first at {first}, again at {second})")]
    DuplicateId {
        id: String,
        first: RecordLocation,
        second: RecordLocation,
    },

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl RuleLoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The record the error points at, when it is record-specific.
    pub fn location(&self) -> Option<&RecordLocation> {
        match self {
            Self::Parse { location, .. } | Self::Invalid { location, .. } => Some(location),
            Self::DuplicateId { second, .. } => Some(second),
            _ => None,
        }
    }
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, RuleLoadError>;

/// Outcome of reading a single file during a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// Path to the file that was read.
    pub path: PathBuf,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// File parsed; `rules` records were taken from it.
    Loaded { rules: usize },
    /// File was skipped (dotfile, unsupported extension).
    Skipped { reason: String },
}

/// Per-file summary of a successful load, in read order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub files: Vec<LoadResult>,
}

impl LoadReport {
    pub(crate) fn loaded(&mut self, path: PathBuf, rules: usize) {
        self.files.push(LoadResult {
            path,
            status: LoadStatus::Loaded { rules },
        });
    }

    pub(crate) fn skipped(&mut self, path: PathBuf, reason: &str) {
        self.files.push(LoadResult {
            path,
            status: LoadStatus::Skipped {
                reason: reason.to_string(),
            },
        });
    }

    /// Total number of rule records read across all files.
    pub fn rule_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                LoadStatus::Loaded { rules } => rules,
                LoadStatus::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn loaded_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, LoadStatus::Loaded { .. }))
            .map(|f| f.path.as_path())
    }

    pub fn skipped_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, LoadStatus::Skipped { .. }))
            .map(|f| f.path.as_path())
    }
}
