//! Core [`RuleLoader`]: scans a directory tree and assembles a [`RuleSet`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::rule_set::{RuleEntry, RuleSet};

use super::error::{LoadReport, Result, RuleLoadError};
use super::format::RuleFormat;

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.jsonl` / `*.ndjson` / `*.yml` /
/// `*.yaml` files and decodes every record. Files are read in lexicographic
/// path order, so declaration order is stable across runs and platforms.
#[derive(Debug, Clone)]
pub struct RuleLoader {
    /// Root directory containing rule files.
    rules_dir: PathBuf,
}

impl RuleLoader {
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Read, validate, and order every rule under the rules directory.
    ///
    /// All-or-nothing: the first unreadable file, undecodable record, invalid
    /// rule, or duplicate id aborts the load.
    pub fn load(&self) -> Result<RuleSet> {
        if !self.rules_dir.is_dir() {
            return Err(RuleLoadError::DirectoryNotFound {
                path: self.rules_dir.clone(),
            });
        }

        let mut report = LoadReport::default();
        let mut files = Vec::new();
        collect_files(&self.rules_dir, &mut files, &mut report)?;
        // Declaration order is path order.
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = Vec::new();
        for (path, format) in files {
            let before = entries.len();
            entries.extend(self.load_file(&path, format)?);
            let count = entries.len() - before;
            debug!(path = %path.display(), rules = count, "read rule file");
            report.loaded(path, count);
        }

        let rule_set = RuleSet::build(entries)?.with_report(report);
        info!(
            path = %self.rules_dir.display(),
            rules = rule_set.len(),
            enabled = rule_set.enabled().count(),
            "loaded rule set"
        );
        Ok(rule_set)
    }

    /// Decode a single rule file without validating it against its siblings.
    pub fn load_file(&self, path: &Path, format: RuleFormat) -> Result<Vec<RuleEntry>> {
        let contents = fs::read_to_string(path).map_err(|e| RuleLoadError::io(path, e))?;
        let records = format.parse(path, &contents)?;
        Ok(records
            .into_iter()
            .map(|(location, rule)| RuleEntry { rule, location })
            .collect())
    }
}

/// Load the rule set stored under `rules_dir`.
pub fn load(rules_dir: impl AsRef<Path>) -> Result<RuleSet> {
    RuleLoader::new(rules_dir.as_ref()).load()
}

/// Recursively gather rule files, reporting anything skipped.
fn collect_files(
    dir: &Path,
    files: &mut Vec<(PathBuf, RuleFormat)>,
    report: &mut LoadReport,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| RuleLoadError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| RuleLoadError::io(dir, e))?;
        let path = entry.path();

        // Skip dotfiles/dotdirs (editor swap files, atomic-write temporaries)
        if is_hidden(&path) {
            if path.is_file() {
                report.skipped(path, "dotfile");
            }
            continue;
        }

        if path.is_dir() {
            collect_files(&path, files, report)?;
            continue;
        }

        match RuleFormat::from_path(&path) {
            Some(format) => files.push((path, format)),
            None => report.skipped(path, "unsupported extension"),
        }
    }

    Ok(())
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
