//! On-disk rule encodings: JSON lines and multi-document YAML.

use std::path::Path;

use serde::Deserialize;

use crate::schema::Rule;

use super::error::{RecordLocation, Result, RuleLoadError};

/// Rule file encoding, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    /// `.jsonl` / `.ndjson`: one JSON object per line.
    JsonLines,
    /// `.yml` / `.yaml`: one rule per `---`-separated document.
    Yaml,
}

impl RuleFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Decode every rule record in `contents`, in file order.
    pub(crate) fn parse(self, path: &Path, contents: &str) -> Result<Vec<(RecordLocation, Rule)>> {
        match self {
            Self::JsonLines => parse_json_lines(path, contents),
            Self::Yaml => parse_yaml_documents(path, contents),
        }
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

fn parse_json_lines(path: &Path, contents: &str) -> Result<Vec<(RecordLocation, Rule)>> {
    let mut records = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        let location = RecordLocation::new(path, idx + 1);
        match serde_json::from_str::<Rule>(line) {
            Ok(rule) => records.push((location, rule)),
            Err(e) => {
                return Err(RuleLoadError::Parse {
                    location,
                    message: e.to_string(),
                })
            }
        }
    }
    Ok(records)
}

fn parse_yaml_documents(path: &Path, contents: &str) -> Result<Vec<(RecordLocation, Rule)>> {
    let mut records = Vec::new();
    for (idx, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let location = RecordLocation::new(path, idx + 1);
        let parse_err = |e: serde_yaml::Error| RuleLoadError::Parse {
            location: location.clone(),
            message: e.to_string(),
        };

        // First pass: generic value, so comment-only documents can be skipped.
        let value = serde_yaml::Value::deserialize(document).map_err(parse_err)?;
        if value.is_null() {
            continue;
        }
        let rule: Rule = serde_yaml::from_value(value).map_err(parse_err)?;
        records.push((location, rule));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("rules/test.jsonl")
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(RuleFormat::from_path(Path::new("a.jsonl")), Some(RuleFormat::JsonLines));
        assert_eq!(RuleFormat::from_path(Path::new("a.ndjson")), Some(RuleFormat::JsonLines));
        assert_eq!(RuleFormat::from_path(Path::new("a.yml")), Some(RuleFormat::Yaml));
        assert_eq!(RuleFormat::from_path(Path::new("a.yaml")), Some(RuleFormat::Yaml));
        assert_eq!(RuleFormat::from_path(Path::new("a.json")), None);
        assert_eq!(RuleFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn json_lines_skip_comments_and_blanks() {
        let contents = "\
# tongue rules
{\"id\":\"a\",\"priority\":1,\"effects\":{}}

// disabled for now
{\"id\":\"b\",\"priority\":2,\"effects\":{}}
";
        let records = RuleFormat::JsonLines.parse(path(), contents).unwrap();
        let got: Vec<_> = records
            .iter()
            .map(|(loc, rule)| (loc.record, rule.id.as_str()))
            .collect();
        assert_eq!(got, vec![(2, "a"), (5, "b")]);
    }

    #[test]
    fn json_lines_report_line_number() {
        let contents = "{\"id\":\"a\",\"priority\":1,\"effects\":{}}\n{\"id\":\"b\",\"priority\":\n";
        let err = RuleFormat::JsonLines.parse(path(), contents).unwrap_err();
        match err {
            RuleLoadError::Parse { location, .. } => {
                assert_eq!(location.file, path());
                assert_eq!(location.record, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn yaml_documents_in_order() {
        let contents = "\
# palm rules
id: palm_life_deep
priority: 20
conditions:
  palm.lines.life: deep
effects:
  advice:
    lifestyle: [耐力训练, 晨练]
---
id: palm_fallback
priority: 0
effects:
  constitution: 平和
";
        let records = RuleFormat::Yaml.parse(Path::new("palm.yml"), contents).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0.record, 1);
        assert_eq!(records[0].1.id, "palm_life_deep");
        assert_eq!(records[1].0.record, 2);
        assert!(records[1].1.is_fallback());
    }

    #[test]
    fn yaml_comment_only_documents_are_ignored() {
        let contents = "# nothing here yet\n";
        let records = RuleFormat::Yaml.parse(Path::new("empty.yml"), contents).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn yaml_bad_document_reports_index() {
        let contents = "id: ok\npriority: 1\neffects: {}\n---\nid: broken\npriority: high\neffects: {}\n";
        let err = RuleFormat::Yaml.parse(Path::new("bad.yml"), contents).unwrap_err();
        assert_eq!(err.location().map(|l| l.record), Some(2));
    }
}
