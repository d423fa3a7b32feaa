//! JSON extraction from free-text model replies.
//!
//! Models wrap their JSON in prose, code fences, or nothing at all. The
//! strategies below are tried in order; each returns a candidate substring or
//! nothing. New heuristics slot into the list without touching callers.

use regex::Regex;

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[Strategy] = &[fenced_json_block, bracketed_array];

/// Returns the first JSON candidate found in `text`, or `None` when no
/// strategy matches. Whether the candidate actually parses is the caller's
/// concern.
pub fn extract_json_payload(text: &str) -> Option<String> {
    STRATEGIES.iter().find_map(|strategy| strategy(text))
}

/// A fenced code block explicitly tagged as JSON.
fn fenced_json_block(text: &str) -> Option<String> {
    let fence = Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap();
    fence
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fallback: the substring between the first `[` and the last `]`.
fn bracketed_array(text: &str) -> Option<String> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if start < end {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_is_extracted() {
        let text = "Some text\n```json\n[{\"title\":\"X\"}]\n```";
        assert_eq!(extract_json_payload(text).as_deref(), Some("[{\"title\":\"X\"}]"));
    }

    #[test]
    fn bare_array_is_found_by_bracket_scan() {
        let text = "Here are the issues: [{\"title\":\"X\"}] hope that helps";
        assert_eq!(extract_json_payload(text).as_deref(), Some("[{\"title\":\"X\"}]"));
    }

    #[test]
    fn fenced_block_wins_over_bracket_scan() {
        let text = "prelude [ignored]\n```json\n[1, 2]\n```\ntrailer [also ignored]";
        assert_eq!(extract_json_payload(text).as_deref(), Some("[1, 2]"));
    }

    #[test]
    fn text_without_json_yields_none() {
        assert_eq!(extract_json_payload("no structured data here"), None);
        assert_eq!(extract_json_payload("a ] mismatched [ pair"), None);
    }
}
