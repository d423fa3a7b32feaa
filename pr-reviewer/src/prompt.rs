//! Review prompt builder.
//!
//! Keep the prompt compact; the diff is fenced for model grounding.

/// Builds the analysis prompt for a concatenated PR diff.
///
/// `snippet_hint` only widens the requested output: when present, the model
/// is additionally asked to include the relevant code snippet for each issue.
pub fn build_review_prompt(diff: &str, snippet_hint: Option<&str>) -> String {
    let mut s = String::new();
    s.push_str("Analyze this code change for:\n");
    s.push_str("1. Security vulnerabilities\n");
    s.push_str("2. Performance issues\n");
    s.push_str("3. Missing error handling\n");
    s.push_str("4. Code quality problems\n");
    s.push_str("\n# Code changes\n```diff\n");
    s.push_str(diff);
    s.push_str("\n```\n");
    s.push_str("\n# Instructions\n");
    s.push_str("- Return a JSON array with every issue found in the change.\n");
    s.push_str(
        "- Each issue: severity, category, file location, line number, title, description, recommendation",
    );
    if snippet_hint.is_some() {
        s.push_str(", code snippet");
    }
    s.push_str(".\n");
    s.push_str("- Line numbers refer to the new version of each file.\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_embedded_in_a_fence() {
        let prompt = build_review_prompt("File: a.ts\n+x", None);
        assert!(prompt.contains("```diff\nFile: a.ts\n+x\n```"));
    }

    #[test]
    fn snippet_hint_widens_the_requested_fields() {
        let without = build_review_prompt("d", None);
        let with = build_review_prompt("d", Some("const x = 1;"));
        assert!(!without.contains("code snippet"));
        assert!(with.contains("code snippet"));
    }
}
