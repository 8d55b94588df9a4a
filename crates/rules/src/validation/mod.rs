//! Rule validation with structured errors and suggestions.
//!
//! Checks the parts of a rule that serde cannot: blank ids, malformed
//! condition paths, non-scalar expected values, and likely typos in
//! observation namespaces and advice categories.
//! Returns a [`ValidationResult`] with errors (fail the load) and warnings (logged).

mod fuzzy;
mod rule_checks;

use serde::{Deserialize, Serialize};

use crate::schema::Rule;

pub use rule_checks::{KNOWN_ADVICE_CATEGORIES, KNOWN_NAMESPACES};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A single finding, located by a dotted path inside the rule record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    /// Location inside the record, e.g. `"conditions.tongue..color"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn warn_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: suggestion.map(|s| format!("did you mean '{s}'?")),
        });
    }

    /// All errors as one line, `path: message` joined by `; `.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.path, e.message)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a decoded [`Rule`].
pub fn validate_rule(rule: &Rule) -> ValidationResult {
    let mut result = ValidationResult::new();
    rule_checks::validate_id(rule, &mut result);
    rule_checks::validate_conditions(rule, &mut result);
    rule_checks::validate_effects(rule, &mut result);
    result
}

/// Parse a single JSON rule record and validate it.
pub fn validate_json(record: &str) -> ValidationResult {
    match serde_json::from_str::<Rule>(record) {
        Ok(rule) => validate_rule(&rule),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("JSON parse error: {e}"));
            result
        }
    }
}
