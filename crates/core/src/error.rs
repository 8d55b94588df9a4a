use thiserror::Error;

/// The caller handed over something that cannot be treated as an observation bundle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("observation must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}
