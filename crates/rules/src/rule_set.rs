//! Immutable, evaluation-ordered rule collections.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::loader::{LoadReport, RecordLocation, Result, RuleLoadError};
use crate::schema::Rule;
use crate::validation::validate_rule;

/// A rule together with the record it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub rule: Rule,
    pub location: RecordLocation,
}

/// A validated rule set in evaluation order.
///
/// Entries are sorted by `priority` descending; equal priorities keep
/// declaration order (file path order, then record order within a file).
/// A `RuleSet` is never mutated after construction; reloading builds a new one.
#[derive(Debug, Clone)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
    loaded_at: DateTime<Utc>,
    report: LoadReport,
}

impl RuleSet {
    /// Validate, de-duplicate, and order a batch of entries.
    ///
    /// Fails on the first invalid rule or repeated id. Validation warnings are
    /// logged and do not fail the build.
    pub fn build(mut entries: Vec<RuleEntry>) -> Result<Self> {
        check_entries(&entries)?;

        // `sort_by` is stable: equal priorities keep declaration order.
        entries.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));

        Ok(Self {
            entries,
            loaded_at: Utc::now(),
            report: LoadReport::default(),
        })
    }

    /// Build from in-memory rules; locations are `<inline>:<n>` in iteration order.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let entries = rules
            .into_iter()
            .enumerate()
            .map(|(idx, rule)| RuleEntry {
                rule,
                location: RecordLocation::new(PathBuf::from("<inline>"), idx + 1),
            })
            .collect();
        Self::build(entries)
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            loaded_at: Utc::now(),
            report: LoadReport::default(),
        }
    }

    pub(crate) fn with_report(mut self, report: LoadReport) -> Self {
        self.report = report;
        self
    }

    /// All entries, disabled ones included, in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    /// Entries that take part in evaluation, in evaluation order.
    pub fn enabled(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter().filter(|e| e.rule.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.rule.id == id)
    }

    /// Rule ids in evaluation order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.rule.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Per-file report of the load that produced this set (empty for in-memory sets).
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Validate every entry and reject repeated ids.
fn check_entries(entries: &[RuleEntry]) -> Result<()> {
    let mut seen: HashMap<&str, &RecordLocation> = HashMap::with_capacity(entries.len());

    for entry in entries {
        let validation = validate_rule(&entry.rule);
        if !validation.valid {
            return Err(RuleLoadError::Invalid {
                location: entry.location.clone(),
                message: validation.error_summary(),
            });
        }
        for warning in &validation.warnings {
            warn!(
                rule_id = %entry.rule.id,
                location = %entry.location,
                path = %warning.path,
                suggestion = warning.suggestion.as_deref().unwrap_or(""),
                "{}",
                warning.message
            );
        }

        if let Some(first) = seen.insert(entry.rule.id.as_str(), &entry.location) {
            return Err(RuleLoadError::DuplicateId {
                id: entry.rule.id.clone(),
                first: first.clone(),
                second: entry.location.clone(),
            });
        }
    }
    Ok(())
}
