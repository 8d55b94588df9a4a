//! Filesystem watching for hot-reload.
//!
//! Creating or modifying a rule file, or removing or renaming any visible
//! path, triggers a full reload through the supplied callback; partial
//! per-file patching would break the all-or-nothing load guarantee.

use std::path::Path;
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use super::core::is_hidden;
use super::error::Result;
use super::format::RuleFormat;

/// Start a recursive watcher on `rules_dir` that calls `on_change` for rule-file events.
///
/// The returned watcher must be kept alive for events to keep flowing.
pub(crate) fn watch_rules_dir<F>(rules_dir: &Path, on_change: F) -> Result<RecommendedWatcher>
where
    F: Fn() + Send + 'static,
{
    let mut watcher = notify::recommended_watcher(
        move |res: std::result::Result<Event, notify::Error>| match res {
            Ok(event) if is_rule_event(&event) => on_change(),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "filesystem watcher error"),
        },
    )?;

    watcher.watch(rules_dir, RecursiveMode::Recursive)?;
    let _ = watcher.configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

    info!(path = %rules_dir.display(), "watching rules directory for changes (recursive)");
    Ok(watcher)
}

/// Whether an event touches a rule file in a way that changes the rule set.
///
/// Removes and renames count on any visible path: moving a subdirectory out
/// of the tree reports only the directory, which carries no rule extension.
pub(crate) fn is_rule_event(event: &Event) -> bool {
    let any_path = match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)) => true,
        EventKind::Create(_)
        | EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any) => false,
        _ => return false,
    };
    event.paths.iter().any(|p| {
        !is_hidden(p) && (any_path || RuleFormat::from_path(p).is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(path.into())
    }

    #[test]
    fn rule_file_changes_are_relevant() {
        assert!(is_rule_event(&event(EventKind::Create(CreateKind::File), "/r/tongue.jsonl")));
        assert!(is_rule_event(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/r/palm.yml"
        )));
        assert!(is_rule_event(&event(EventKind::Remove(RemoveKind::File), "/r/solar.yaml")));
    }

    #[test]
    fn directory_remove_and_rename_are_relevant() {
        assert!(is_rule_event(&event(EventKind::Remove(RemoveKind::Folder), "/r/seasonal")));
        assert!(is_rule_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            "/r/seasonal"
        )));
        assert!(is_rule_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            "/r/seasonal"
        )));
    }

    #[test]
    fn other_events_are_ignored() {
        assert!(!is_rule_event(&event(EventKind::Create(CreateKind::File), "/r/notes.txt")));
        assert!(!is_rule_event(&event(EventKind::Create(CreateKind::File), "/r/.tongue.jsonl")));
        assert!(!is_rule_event(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
            "/r/tongue.jsonl"
        )));
        assert!(!is_rule_event(&event(EventKind::Access(AccessKind::Any), "/r/tongue.jsonl")));
        assert!(!is_rule_event(&event(EventKind::Remove(RemoveKind::Folder), "/r/.drafts")));
        assert!(!is_rule_event(&event(EventKind::Create(CreateKind::Folder), "/r/seasonal")));
    }
}
