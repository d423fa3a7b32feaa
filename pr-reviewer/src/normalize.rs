//! Issue normalization.
//!
//! The model replies in several shapes: a plain array of issues, or an
//! object keyed by category whose values are single issue objects or arrays
//! of them. [`normalize_issues`] flattens all of these into one ordered list;
//! anything else yields an empty list. It never errors.
//!
//! [`issue_from_value`] then collapses each raw object into the canonical
//! [`Issue`], reading the locator synonyms (`file`/`fileLocation`/`location`,
//! `line`/`lineNumber`) in fixed order so they never travel deeper into the
//! pipeline.

use analysis_store::{Issue, Severity};
use serde_json::{Map, Value};

/// Flattens a parsed model payload into an ordered list of raw issue values.
///
/// - Array input is returned unchanged, element order preserved.
/// - Object input is walked key by key in enumeration order; each key becomes
///   the `category` of the issues under it.
/// - Any other shape (null, number, string, bool) yields an empty list.
pub fn normalize_issues(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(category, value)| match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| with_category(category, item))
                    .collect::<Vec<_>>(),
                other => vec![with_category(category, other)],
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Merges the category key in *before* the element's own fields, so an
/// explicit per-issue `category` wins over the object key.
fn with_category(category: &str, issue: &Value) -> Value {
    let mut merged = Map::new();
    merged.insert("category".to_string(), Value::String(category.to_string()));
    if let Value::Object(fields) = issue {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

/// Collapses a list of raw issue values into canonical records.
pub fn to_canonical(raw: &[Value]) -> Vec<Issue> {
    raw.iter().map(issue_from_value).collect()
}

/// Collapses one raw issue object into the canonical [`Issue`].
///
/// Synonym fields are read as ordered fallbacks; empty strings and nulls are
/// skipped the same way the upstream payloads treat them.
pub fn issue_from_value(value: &Value) -> Issue {
    Issue {
        title: str_field(value, &["title", "issue"]),
        description: str_field(value, &["description"]),
        recommendation: str_field(value, &["recommendation"]),
        severity: value
            .get("severity")
            .and_then(Value::as_str)
            .map(Severity::parse)
            .unwrap_or_default(),
        category: str_field(value, &["category", "type"]),
        file: str_field(value, &["file", "fileLocation", "location"]),
        line: num_field(value, &["line", "lineNumber"]),
        code_snippet: str_field(value, &["codeSnippet", "code_snippet"]),
    }
}

fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn num_field(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_pass_through_unchanged() {
        let data = json!([{"title": "a"}, {"title": "b"}]);
        let out = normalize_issues(&data);
        assert_eq!(out, vec![json!({"title": "a"}), json!({"title": "b"})]);
    }

    #[test]
    fn category_objects_flatten_in_key_order() {
        let data = json!({
            "security": [{"title": "i1"}, {"title": "i2"}],
            "perf": {"title": "i3"}
        });
        let out = normalize_issues(&data);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["category"], "security");
        assert_eq!(out[0]["title"], "i1");
        assert_eq!(out[1]["category"], "security");
        assert_eq!(out[1]["title"], "i2");
        assert_eq!(out[2]["category"], "perf");
        assert_eq!(out[2]["title"], "i3");
    }

    #[test]
    fn an_explicit_issue_category_wins_over_the_key() {
        let data = json!({"security": [{"title": "x", "category": "crypto"}]});
        let out = normalize_issues(&data);
        assert_eq!(out[0]["category"], "crypto");
    }

    #[test]
    fn scalar_inputs_yield_an_empty_list() {
        assert!(normalize_issues(&Value::Null).is_empty());
        assert!(normalize_issues(&json!(42)).is_empty());
        assert!(normalize_issues(&json!("text")).is_empty());
        assert!(normalize_issues(&json!(true)).is_empty());
    }

    #[test]
    fn locator_synonyms_collapse_in_order() {
        let issue = issue_from_value(&json!({
            "title": "X",
            "fileLocation": "src/a.ts",
            "lineNumber": 12,
            "severity": "High"
        }));
        assert_eq!(issue.file.as_deref(), Some("src/a.ts"));
        assert_eq!(issue.line, Some(12));
        assert_eq!(issue.severity, Severity::High);
    }

    #[test]
    fn the_first_usable_synonym_wins() {
        let issue = issue_from_value(&json!({
            "file": "src/primary.ts",
            "location": "src/fallback.ts",
            "line": 3
        }));
        assert_eq!(issue.file.as_deref(), Some("src/primary.ts"));
    }

    #[test]
    fn empty_and_null_synonyms_fall_through() {
        let issue = issue_from_value(&json!({
            "file": "",
            "fileLocation": null,
            "location": "src/real.ts"
        }));
        assert_eq!(issue.file.as_deref(), Some("src/real.ts"));
    }

    #[test]
    fn numeric_strings_parse_as_line_numbers() {
        let issue = issue_from_value(&json!({"line": "17"}));
        assert_eq!(issue.line, Some(17));
    }
}
