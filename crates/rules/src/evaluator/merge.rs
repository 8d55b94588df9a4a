//! Folding matched rules' effects into one result.
//!
//! Constitution: first non-blank label in evaluation order wins.
//! Advice: per category, items append in evaluation order and an item is
//! dropped if an equivalent one is already present.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::schema::Effects;

/// Trailing marks stripped before comparing advice items, alongside ASCII
/// punctuation. Full-width closers mirror the ASCII `)` and `"`.
const TRAILING_MARKS: &[char] = &[
    '。', '，', '、', '；', '：', '！', '？', '…', '～', '．', '）', '”', '’', '」', '』', '》', '】',
];

/// Comparison key for an advice item: trimmed, trailing punctuation
/// stripped, lowercased. `"晨练。"`, `" 晨练 "` and `"晨练"` share a key.
pub fn normalize_advice(item: &str) -> String {
    item.trim()
        .trim_end_matches(|c: char| {
            c.is_whitespace() || c.is_ascii_punctuation() || TRAILING_MARKS.contains(&c)
        })
        .to_lowercase()
}

#[derive(Debug, Default)]
struct Category {
    items: Vec<String>,
    seen: HashSet<String>,
}

/// Accumulates constitution and advice across matched rules.
#[derive(Debug)]
pub(crate) struct EffectsAccumulator<'r> {
    constitution: Option<(&'r str, &'r str)>,
    advice: IndexMap<String, Category>,
}

impl<'r> EffectsAccumulator<'r> {
    pub(crate) fn new() -> Self {
        Self {
            constitution: None,
            advice: IndexMap::new(),
        }
    }

    /// Fold one rule's effects. Call in evaluation order.
    pub(crate) fn apply(&mut self, rule_id: &'r str, effects: &'r Effects) {
        if self.constitution.is_none() {
            self.constitution = effects.constitution().map(|c| (c, rule_id));
        }

        for (name, items) in effects.advice() {
            let category = self.advice.entry(name.to_string()).or_default();
            for item in items {
                let key = normalize_advice(item);
                if key.is_empty() || !category.seen.insert(key) {
                    continue;
                }
                category.items.push(item.trim().to_string());
            }
        }
    }

    /// `(constitution, source rule id)`; the source is `None` when `default` was used.
    pub(crate) fn constitution(&self, default: &str) -> (String, Option<String>) {
        match self.constitution {
            Some((label, rule_id)) => (label.to_string(), Some(rule_id.to_string())),
            None => (default.to_string(), None),
        }
    }

    pub(crate) fn into_advice(self) -> IndexMap<String, Vec<String>> {
        self.advice
            .into_iter()
            .filter(|(_, category)| !category.items.is_empty())
            .map(|(name, category)| (name, category.items))
            .collect()
    }
}
