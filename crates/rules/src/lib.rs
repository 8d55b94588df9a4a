//! Rule-based constitution and advice inference.
//!
//! This crate provides:
//! - JSON-lines / YAML rule files with serde deserialization
//! - An all-or-nothing directory loader with validation and hot-reload via `notify`
//! - Priority-ordered condition evaluation over nested observation bundles
//! - Constitution selection and de-duplicated advice merging
//! - [`RuleEngine`] with atomic snapshot swaps, plus a process-wide default instance

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod rule_set;
pub mod schema;
pub mod validation;

pub use engine::{default_engine, execute_rules, reload_rules, RuleEngine};
pub use error::{RuleError, RuleEvaluationError};
pub use evaluator::{ConstitutionResult, Evaluation};
pub use loader::{load, LoadReport, RecordLocation, RuleLoadError};
pub use rule_set::{RuleEntry, RuleSet};
pub use schema::{Effects, Rule};
