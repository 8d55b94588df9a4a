//! Observation bundles: the structured input a rule evaluation runs against.
//!
//! An observation is an arbitrary-depth JSON object namespaced by module
//! (`palm`, `tongue`, `dream`, `solar`, ...). Nothing here validates domain
//! semantics; the only operation is dotted-path lookup.

use serde_json::{Map, Value};

use crate::error::ObservationError;

/// Borrowed view over a caller-supplied observation object.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    root: &'a Map<String, Value>,
}

impl<'a> Observation<'a> {
    /// Wrap a JSON value, rejecting anything that is not an object.
    pub fn new(value: &'a Value) -> Result<Self, ObservationError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ObservationError::NotAnObject {
                found: value_kind(other),
            }),
        }
    }

    /// Resolve a dotted path such as `palm.lines.life`.
    ///
    /// Returns `None` when any segment is missing or the path descends into a
    /// scalar. Numeric segments index into arrays (`dream.keywords.0`).
    pub fn resolve(&self, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = step(current, segment)?;
        }
        Some(current)
    }
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Human-readable JSON type name used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
