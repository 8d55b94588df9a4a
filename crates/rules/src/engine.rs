//! [`RuleEngine`]: owns the active rule-set snapshot and runs evaluations.
//!
//! Readers clone an `Arc<RuleSet>` under a short read lock and evaluate
//! without holding it, so an in-flight `execute` always finishes against the
//! snapshot it started with. `reload` builds the replacement off-lock and
//! swaps the pointer; a failed reload leaves the previous snapshot active.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use notify::RecommendedWatcher;
use serde_json::Value;
use tracing::{debug, info, warn};

use qi_core::config::{self, Config, RulesConfig};
use qi_core::Observation;

use crate::error::{RuleError, RuleEvaluationError};
use crate::evaluator::{evaluate, Evaluation};
use crate::loader::{self, LoadReport, RuleLoadError, RuleLoader};
use crate::rule_set::RuleSet;

/// Evaluates observations against a hot-swappable rule set.
pub struct RuleEngine {
    /// `None` for engines built from an in-memory rule set.
    loader: Option<RuleLoader>,
    default_constitution: String,
    active: Arc<RwLock<Arc<RuleSet>>>,
    /// Serializes reloads so a slow, older load never replaces a newer one.
    reload_lock: Arc<Mutex<()>>,
    /// Active filesystem watcher (held to keep it alive).
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl RuleEngine {
    /// Load every rule under `rules_dir` and build an engine around it.
    pub fn open(
        rules_dir: impl Into<PathBuf>,
        default_constitution: impl Into<String>,
    ) -> loader::Result<Self> {
        let loader = RuleLoader::new(rules_dir);
        let rule_set = loader.load()?;
        Ok(Self::assemble(Some(loader), rule_set, default_constitution.into()))
    }

    pub fn from_config(config: &RulesConfig) -> loader::Result<Self> {
        let engine = Self::open(config.dir.clone(), config.default_constitution.clone())?;
        if config.watch {
            engine.watch()?;
        }
        Ok(engine)
    }

    /// Wrap an already-built rule set. `reload` on such an engine is a no-op.
    pub fn from_rule_set(rule_set: RuleSet, default_constitution: impl Into<String>) -> Self {
        Self::assemble(None, rule_set, default_constitution.into())
    }

    fn assemble(loader: Option<RuleLoader>, rule_set: RuleSet, default_constitution: String) -> Self {
        Self {
            loader,
            default_constitution,
            active: Arc::new(RwLock::new(Arc::new(rule_set))),
            reload_lock: Arc::new(Mutex::new(())),
            watcher: Mutex::new(None),
        }
    }

    /// The currently active rule set.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.active.read().expect("rule set lock poisoned"))
    }

    pub fn rules_dir(&self) -> Option<&Path> {
        self.loader.as_ref().map(RuleLoader::rules_dir)
    }

    pub fn default_constitution(&self) -> &str {
        &self.default_constitution
    }

    /// Evaluate one observation bundle.
    ///
    /// Fails only when `observation` is not a JSON object.
    pub fn execute(&self, observation: &Value) -> Result<Evaluation, RuleEvaluationError> {
        let observation = Observation::new(observation)?;
        let rule_set = self.snapshot();
        Ok(evaluate(&rule_set, &observation, &self.default_constitution))
    }

    /// Re-read the rules directory and atomically swap in the result.
    ///
    /// On error the previous rule set stays active.
    pub fn reload(&self) -> loader::Result<LoadReport> {
        match &self.loader {
            Some(source) => reload_into(source, &self.active, &self.reload_lock),
            None => {
                debug!("reload requested on in-memory rule set, nothing to do");
                Ok(self.snapshot().report().clone())
            }
        }
    }

    /// Reload automatically whenever a rule file under the rules directory changes.
    ///
    /// Failed hot-reloads are logged and the last good rule set keeps serving.
    /// Calling this twice replaces the previous watcher.
    pub fn watch(&self) -> loader::Result<()> {
        let Some(source) = self.loader.clone() else {
            warn!("watch requested on in-memory rule set, ignoring");
            return Ok(());
        };

        let active = Arc::clone(&self.active);
        let reload_lock = Arc::clone(&self.reload_lock);
        let rules_dir = source.rules_dir().to_path_buf();

        let watcher = loader::watch_rules_dir(&rules_dir, move || {
            if let Err(e) = reload_into(&source, &active, &reload_lock) {
                warn!(
                    path = %source.rules_dir().display(),
                    error = %e,
                    "hot-reload failed, keeping previous rule set"
                );
            }
        })?;

        *self.watcher.lock().expect("watcher lock poisoned") = Some(watcher);
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.lock().expect("watcher lock poisoned").is_some()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules_dir", &self.rules_dir())
            .field("default_constitution", &self.default_constitution)
            .field("rules", &self.snapshot().len())
            .field("watching", &self.is_watching())
            .finish()
    }
}

fn reload_into(
    source: &RuleLoader,
    active: &RwLock<Arc<RuleSet>>,
    reload_lock: &Mutex<()>,
) -> loader::Result<LoadReport> {
    let _serial = reload_lock.lock().expect("reload lock poisoned");

    let rule_set = source.load()?;
    let report = rule_set.report().clone();
    let rules = rule_set.len();

    let previous = std::mem::replace(
        &mut *active.write().expect("rule set lock poisoned"),
        Arc::new(rule_set),
    );

    info!(
        path = %source.rules_dir().display(),
        rules,
        previous = previous.len(),
        "rule set reloaded"
    );
    Ok(report)
}

// ── Process-wide default instance ───────────────────────────────────

static DEFAULT_ENGINE: OnceLock<RuleEngine> = OnceLock::new();

/// The process-wide engine, built from the environment on first use.
///
/// Reads `.env`, then `RULES_DIR` / `RULES_DEFAULT_CONSTITUTION` /
/// `RULES_WATCH` (see [`qi_core::Config`]). If the first load fails the
/// error is returned and the next call tries again.
pub fn default_engine() -> Result<&'static RuleEngine, RuleLoadError> {
    if let Some(engine) = DEFAULT_ENGINE.get() {
        return Ok(engine);
    }

    config::load_dotenv();
    let cfg = Config::from_env();
    cfg.log_summary();

    let engine = RuleEngine::from_config(&cfg.rules)?;
    Ok(DEFAULT_ENGINE.get_or_init(move || engine))
}

/// Evaluate `observation` with the process-wide engine.
pub fn execute_rules(observation: &Value) -> Result<Evaluation, RuleError> {
    Ok(default_engine()?.execute(observation)?)
}

/// Reload the process-wide engine's rules from disk.
pub fn reload_rules() -> Result<LoadReport, RuleError> {
    Ok(default_engine()?.reload()?)
}
