//! End-to-end engine tests against rule directories on disk.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde_json::json;
use tempfile::TempDir;

use qi_core::RulesConfig;
use qi_rules::{RuleEngine, RuleLoadError};

const FIXTURE_RULES: &str = r#"# fixtures used by report generation tests
{"id":"test_tongue_pale","priority":100,"conditions":{"tongue.color":"pale"},"effects":{"constitution":"阳虚","advice":{"diet":["羊肉汤"]}}}
{"id":"test_global_fallback","priority":0,"effects":{"constitution":"平和","advice":{"lifestyle":["保持节律"]}}}
"#;

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().expect("create tempdir");
    fs::write(dir.path().join("fixtures.jsonl"), FIXTURE_RULES).unwrap();
    dir
}

fn open(dir: &TempDir) -> RuleEngine {
    RuleEngine::open(dir.path(), "平和").expect("load fixture rules")
}

#[test]
fn pale_tongue_fixture() {
    let dir = fixture_dir();
    let engine = open(&dir);

    let eval = engine.execute(&json!({"tongue": {"color": "pale"}})).unwrap();
    assert_eq!(eval.result.constitution, "阳虚");
    assert_eq!(eval.advice("diet"), ["羊肉汤"]);
    assert_eq!(eval.matched_rules[0], "test_tongue_pale");

    let eval = engine.execute(&json!({"tongue": {"color": "unknown"}})).unwrap();
    assert_eq!(eval.result.constitution, "平和");
    assert!(eval.matched_rules.iter().any(|id| id == "test_global_fallback"));
}

#[test]
fn open_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let err = RuleEngine::open(dir.path().join("rules"), "平和").unwrap_err();
    assert!(matches!(err, RuleLoadError::DirectoryNotFound { .. }));
}

#[test]
fn reload_picks_up_changes() {
    let dir = fixture_dir();
    let engine = open(&dir);
    let before = engine.snapshot();

    fs::write(
        dir.path().join("palm.yml"),
        "id: palm_life_deep\npriority: 50\nconditions:\n  palm.lines.life: deep\neffects:\n  constitution: 气虚\n  advice:\n    lifestyle: [耐力训练, 晨练]\n",
    )
    .unwrap();

    let report = engine.reload().unwrap();
    assert_eq!(report.rule_count(), 3);

    let eval = engine
        .execute(&json!({"palm": {"lines": {"life": "deep"}}}))
        .unwrap();
    assert_eq!(eval.result.constitution, "气虚");
    assert_eq!(eval.matched_rules, vec!["palm_life_deep", "test_global_fallback"]);
    assert_eq!(eval.advice("lifestyle"), ["耐力训练", "晨练", "保持节律"]);

    // Snapshots taken before the reload are unaffected.
    assert_eq!(before.len(), 2);
    assert_eq!(engine.snapshot().len(), 3);
}

#[test]
fn failed_reload_keeps_previous_rule_set() {
    let dir = fixture_dir();
    let engine = open(&dir);
    let before = engine.snapshot();

    fs::write(dir.path().join("broken.jsonl"), "{\"id\":\"half\",").unwrap();
    let err = engine.reload().unwrap_err();
    assert!(matches!(err, RuleLoadError::Parse { .. }), "{err:?}");

    let after = engine.snapshot();
    assert!(std::sync::Arc::ptr_eq(&before, &after));
    let eval = engine.execute(&json!({"tongue": {"color": "pale"}})).unwrap();
    assert_eq!(eval.result.constitution, "阳虚");

    // A duplicate id is rejected the same way.
    fs::remove_file(dir.path().join("broken.jsonl")).unwrap();
    fs::write(dir.path().join("z_copy.jsonl"), FIXTURE_RULES).unwrap();
    let err = engine.reload().unwrap_err();
    assert!(err.to_string().starts_with("duplicate rule id:"), "{err}");
    assert!(std::sync::Arc::ptr_eq(&before, &engine.snapshot()));
}

#[test]
fn removing_the_directory_fails_reload_but_keeps_serving() {
    let dir = fixture_dir();
    let engine = open(&dir);
    let path = dir.path().to_path_buf();
    drop(dir);
    assert!(!path.exists());

    assert!(matches!(engine.reload(), Err(RuleLoadError::DirectoryNotFound { .. })));
    let eval = engine.execute(&json!({"tongue": {"color": "pale"}})).unwrap();
    assert_eq!(eval.result.constitution, "阳虚");
}

#[test]
fn concurrent_execute_during_reload_sees_whole_snapshots() {
    let dir = fixture_dir();
    let engine = open(&dir);

    // Alternate between two rule sets that disagree on the pale-tongue label.
    let variant = FIXTURE_RULES.replace("阳虚", "气虚");
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    let eval = engine
                        .execute(&json!({"tongue": {"color": "pale"}}))
                        .unwrap();
                    assert!(
                        eval.result.constitution == "阳虚" || eval.result.constitution == "气虚",
                        "unexpected label {}",
                        eval.result.constitution
                    );
                    assert_eq!(eval.matched_rules, vec!["test_tongue_pale", "test_global_fallback"]);
                }
            });
        }

        for round in 0..20 {
            let contents = if round % 2 == 0 { variant.as_str() } else { FIXTURE_RULES };
            // Write to a dotfile then rename so the loader never sees a half-written file.
            let tmp = dir.path().join(".fixtures.jsonl.tmp");
            fs::write(&tmp, contents).unwrap();
            fs::rename(&tmp, dir.path().join("fixtures.jsonl")).unwrap();
            engine.reload().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
    });
}

#[test]
fn disabled_rule_in_file_is_not_evaluated() {
    let dir = fixture_dir();
    fs::write(
        dir.path().join("seasonal.jsonl"),
        r#"{"id":"winter_cold","priority":200,"enabled":false,"conditions":{"tongue.color":"pale"},"effects":{"constitution":"寒凝"}}"#,
    )
    .unwrap();
    let engine = open(&dir);

    assert_eq!(engine.snapshot().len(), 3);
    let eval = engine.execute(&json!({"tongue": {"color": "pale"}})).unwrap();
    assert_eq!(eval.result.constitution, "阳虚");
    assert!(!eval.matched_rules.iter().any(|id| id == "winter_cold"));
}

#[test]
fn from_config_with_watch_starts_watcher() {
    let dir = fixture_dir();
    let config = RulesConfig {
        dir: dir.path().to_path_buf(),
        default_constitution: "气虚".to_string(),
        watch: true,
    };

    let engine = RuleEngine::from_config(&config).unwrap();
    assert!(engine.is_watching());
    assert_eq!(engine.rules_dir(), Some(dir.path()));
    let eval = engine.execute(&json!({"tongue": {"color": "purple"}})).unwrap();
    assert_eq!(eval.result.constitution, "平和");

    let unwatched = RuleEngine::from_config(&RulesConfig { watch: false, ..config }).unwrap();
    assert!(!unwatched.is_watching());
    assert_eq!(unwatched.default_constitution(), "气虚");
}

#[test]
fn from_config_missing_directory_fails_before_watching() {
    let dir = TempDir::new().unwrap();
    let config = RulesConfig {
        dir: dir.path().join("absent"),
        watch: true,
        ..RulesConfig::default()
    };
    let err = RuleEngine::from_config(&config).unwrap_err();
    assert!(matches!(err, RuleLoadError::DirectoryNotFound { .. }), "{err:?}");
}
