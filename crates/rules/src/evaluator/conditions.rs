//! Condition matching against an observation bundle.
//!
//! All conditions of a rule are ANDed. A path that does not resolve is a
//! plain non-match, never an error.

use serde_json::{Number, Value};

use qi_core::Observation;

use crate::schema::Rule;

/// True when every condition of `rule` holds for `observation`.
/// Rules without conditions always match.
pub fn rule_matches(rule: &Rule, observation: &Observation<'_>) -> bool {
    rule.conditions()
        .all(|(path, expected)| condition_holds(observation, path, expected))
}

/// Resolve `path` and compare it with `expected`.
///
/// When the resolved value is an array the condition holds if any element
/// equals `expected` (`dream.keywords` contains `"蛇"`).
pub fn condition_holds(observation: &Observation<'_>, path: &str, expected: &Value) -> bool {
    match observation.resolve(path) {
        Some(Value::Array(items)) if !expected.is_array() => {
            items.iter().any(|item| scalar_eq(item, expected))
        }
        Some(actual) => scalar_eq(actual, expected),
        None => false,
    }
}

/// Exact equality; numbers compare by value so `1` equals `1.0`.
fn scalar_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_eq(a, b),
        (a, b) => a == b,
    }
}

/// Integers compare exactly; only a float on either side goes through `f64`.
fn numbers_eq(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y);
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        // At least one side exceeds i64::MAX.
        _ => a.as_u64().is_some() && a.as_u64() == b.as_u64(),
    }
}
