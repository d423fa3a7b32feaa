//! Persisted data model for pull-request analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Severity scale for a single review finding.
///
/// The model is not trusted to spell the scale exactly, so deserialization is
/// lenient: case variants are accepted and anything unrecognized falls back
/// to [`Severity::Low`] instead of failing the whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// Parses a severity label leniently.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "high" | "critical" => Severity::High,
            "medium" | "moderate" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::parse(&raw))
    }
}

/// One structured finding extracted from a model review of a diff.
///
/// File and line locators are canonical here. Upstream payloads spell them
/// several ways (`file` / `fileLocation` / `location`, `line` / `lineNumber`);
/// the normalizer collapses them before an `Issue` is ever constructed, so
/// the synonyms never travel past that boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Path of the affected file, relative to the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number in the new version of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

/// The persisted outcome of reviewing one pull request.
///
/// At most one record exists per (`repository`, `pr_number`); the store's
/// uniqueness constraint enforces this. Records are never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub analysis_id: String,
    /// Composite key `owner/repo`.
    pub repository: String,
    pub pr_number: u64,
    pub issues: Vec<Issue>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Builds a fresh record with a random `analysis_id` and the current time.
    pub fn new(repository: impl Into<String>, pr_number: u64, issues: Vec<Issue>) -> Self {
        Self {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            repository: repository.into(),
            pr_number,
            issues,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parsing_is_lenient() {
        assert_eq!(Severity::parse("High"), Severity::High);
        assert_eq!(Severity::parse("CRITICAL"), Severity::High);
        assert_eq!(Severity::parse("medium"), Severity::Medium);
        assert_eq!(Severity::parse("whatever"), Severity::Low);
    }

    #[test]
    fn issue_deserializes_with_missing_fields() {
        let issue: Issue = serde_json::from_str(r#"{"title":"X","severity":"HIGH"}"#).unwrap();
        assert_eq!(issue.title.as_deref(), Some("X"));
        assert_eq!(issue.severity, Severity::High);
        assert!(issue.file.is_none());
        assert!(issue.line.is_none());
    }
}
