//! Per-rule checks: id, conditions, effects.

use serde_json::Value;

use crate::schema::Rule;

use super::fuzzy::{closest, is_rule_id_style};
use super::ValidationResult;

/// Observation modules the application produces.
pub const KNOWN_NAMESPACES: &[&str] = &["palm", "tongue", "dream", "solar"];

/// Advice categories the report renderer knows how to show.
pub const KNOWN_ADVICE_CATEGORIES: &[&str] =
    &["diet", "lifestyle", "action", "exercise", "sleep", "emotion"];

pub(super) fn validate_id(rule: &Rule, result: &mut ValidationResult) {
    if rule.id.trim().is_empty() {
        result.error("id", "rule id must not be empty");
    } else if !is_rule_id_style(&rule.id) {
        result.warn(
            "id",
            format!(
                "rule id '{}' should be lowercase words joined by '_' or '-'",
                rule.id
            ),
        );
    }
}

pub(super) fn validate_conditions(rule: &Rule, result: &mut ValidationResult) {
    for (path, expected) in rule.conditions() {
        let at = format!("conditions.{path}");

        if path.trim().is_empty() {
            result.error(at, "condition path must not be empty");
            continue;
        }
        if path.split('.').any(|segment| segment.trim().is_empty()) {
            result.error(at, format!("condition path '{path}' has an empty segment"));
            continue;
        }

        match expected {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
            other => result.error(
                at.clone(),
                format!(
                    "expected value must be a string, number, or boolean, found {}",
                    qi_core::value_kind(other)
                ),
            ),
        }

        let namespace = path.split('.').next().unwrap_or_default();
        if !KNOWN_NAMESPACES.contains(&namespace) {
            result.warn_with_suggestion(
                at,
                format!("unknown observation namespace '{namespace}'"),
                closest(namespace, KNOWN_NAMESPACES),
            );
        }
    }
}

pub(super) fn validate_effects(rule: &Rule, result: &mut ValidationResult) {
    let effects = &rule.effects;

    if effects.constitution.is_some() && effects.constitution().is_none() {
        result.warn(
            "effects.constitution",
            "blank constitution is treated as unspecified",
        );
    }

    for (category, items) in effects.advice() {
        let at = format!("effects.advice.{category}");
        if !KNOWN_ADVICE_CATEGORIES.contains(&category) {
            result.warn_with_suggestion(
                at.clone(),
                format!("unknown advice category '{category}'"),
                closest(category, KNOWN_ADVICE_CATEGORIES),
            );
        }
        for (idx, item) in items.iter().enumerate() {
            if item.trim().is_empty() {
                result.warn(format!("{at}[{idx}]"), "blank advice item is ignored");
            }
        }
    }

    if effects.is_empty() {
        result.warn("effects", "rule sets neither a constitution nor any advice");
    }
}
