//! Evaluation errors and the umbrella error for the convenience entry points.

use qi_core::ObservationError;

use crate::loader::RuleLoadError;

/// The observation handed to `execute` could not be evaluated.
///
/// Returned before any rule runs; no partial result exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleEvaluationError {
    #[error("invalid observation: {0}")]
    InvalidObservation(#[from] ObservationError),
}

/// Either half of the engine failing, for callers of the process-wide helpers.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Load(#[from] RuleLoadError),

    #[error(transparent)]
    Evaluation(#[from] RuleEvaluationError),
}
