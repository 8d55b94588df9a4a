//! Rule evaluation: match every enabled rule in priority order, then fold
//! the matches into one [`Evaluation`].
//!
//! Evaluation is pure and synchronous over an immutable [`RuleSet`]; the
//! same rule set and observation always produce the same result.

mod conditions;
mod merge;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qi_core::Observation;

use crate::rule_set::RuleSet;

pub use conditions::{condition_holds, rule_matches};
pub use merge::normalize_advice;

use merge::EffectsAccumulator;

// ── Result types ────────────────────────────────────────────────────

/// Classification and advice derived from one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionResult {
    pub constitution: String,
    /// Category -> de-duplicated items, categories in first-seen order.
    pub advice: IndexMap<String, Vec<String>>,
    /// Rule that supplied `constitution`; `None` when the default label was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitution_source: Option<String>,
}

/// Output of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub result: ConstitutionResult,
    /// Ids of every matching rule, in evaluation order.
    pub matched_rules: Vec<String>,
}

impl Evaluation {
    pub fn advice(&self, category: &str) -> &[String] {
        self.result
            .advice
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ── Evaluation ──────────────────────────────────────────────────────

/// Evaluate `observation` against `rule_set`.
///
/// Disabled rules are skipped. `default_constitution` is used when no
/// matching rule names a constitution.
pub fn evaluate(
    rule_set: &RuleSet,
    observation: &Observation<'_>,
    default_constitution: &str,
) -> Evaluation {
    let mut matched_rules = Vec::new();
    let mut effects = EffectsAccumulator::new();

    for entry in rule_set.enabled() {
        if !rule_matches(&entry.rule, observation) {
            continue;
        }
        matched_rules.push(entry.rule.id.clone());
        effects.apply(&entry.rule.id, &entry.rule.effects);
    }

    let (constitution, constitution_source) = effects.constitution(default_constitution);
    let advice = effects.into_advice();

    debug!(
        matched = ?matched_rules,
        constitution = %constitution,
        source = constitution_source.as_deref().unwrap_or("default"),
        "evaluated observation"
    );

    Evaluation {
        result: ConstitutionResult {
            constitution,
            advice,
            constitution_source,
        },
        matched_rules,
    }
}
