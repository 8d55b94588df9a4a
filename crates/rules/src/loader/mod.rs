//! Filesystem rule loader with optional hot-reload via `notify` watcher.
//!
//! Scans the rules directory for JSON-lines and YAML rule files and builds an
//! immutable [`RuleSet`](crate::rule_set::RuleSet). Loads are all-or-nothing.

mod core;
mod error;
mod format;
mod watcher;


pub use self::core::{load, RuleLoader};
pub use self::error::{LoadReport, LoadResult, LoadStatus, RecordLocation, Result, RuleLoadError};
pub use self::format::RuleFormat;
pub(crate) use self::watcher::watch_rules_dir;
