//! The patch a matching rule contributes to the evaluation result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Effects applied when a rule matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Effects {
    /// Primary classification label, e.g. `阳虚`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<String>,
    /// Advice category (`diet`, `lifestyle`, ...) -> ordered items to append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<IndexMap<String, Vec<String>>>,
}

impl Effects {
    /// The constitution label, if present and not blank.
    pub fn constitution(&self) -> Option<&str> {
        self.constitution
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Advice categories in declaration order.
    pub fn advice(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.advice
            .iter()
            .flat_map(|a| a.iter())
            .map(|(category, items)| (category.as_str(), items.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.constitution().is_none() && self.advice().all(|(_, items)| items.is_empty())
    }
}
