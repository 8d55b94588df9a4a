//! Rule records: identity, priority, conditions, and effects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Effects;

/// A declarative condition -> effect record.
///
/// `conditions` maps a dotted observation path (`tongue.color`) to the value
/// it must equal. A rule whose conditions are absent, `null`, or empty is a
/// fallback and matches every observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub id: String,
    /// Higher runs first and wins constitution conflicts.
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Disabled rules are loaded and validated but never evaluated.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<IndexMap<String, Value>>,
    pub effects: Effects,
}

impl Rule {
    /// True when the rule has no conditions and therefore always matches.
    pub fn is_fallback(&self) -> bool {
        self.conditions.as_ref().map_or(true, |c| c.is_empty())
    }

    /// Conditions in declaration order as `(path, expected)` pairs.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions
            .iter()
            .flat_map(|c| c.iter())
            .map(|(path, expected)| (path.as_str(), expected))
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.as_ref().map_or(0, |c| c.len())
    }
}

pub(crate) fn default_true() -> bool {
    true
}
