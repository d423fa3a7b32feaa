//! Diff position resolution for review-comment placement.
//!
//! GitHub's review-comment API addresses an inline comment by "position":
//! the 1-based ordinal of a line within the file's unified-diff patch,
//! counting every patch line (hunk headers, context, additions, deletions).
//! This module maps a line number in the new version of a file to that
//! ordinal.

use regex::Regex;

/// Maps `target_line` (1-based, in the new file) to its diff position.
///
/// Walks the patch with two counters: the overall position (every patch line,
/// hunk headers included) and the new-file line number. Each hunk header like
/// `@@ -1,5 +10,6 @@` resets the new-file counter to `new_start - 1` so the
/// first tracked line after it lands on `new_start`. Deletions consume a
/// position but never advance the new-file counter and never match.
///
/// A malformed or missing hunk header leaves the new-file counter unmodified,
/// so positions for such patches are computed against whatever origin the
/// counter was left at. That mirrors the placement API's own tolerance and
/// is intentional, not corrected here.
///
/// Returns `None` when `target_line` never appears as an added or context
/// line; callers treat that as "nothing to comment on", not as an error.
pub fn resolve_diff_position(patch: &str, target_line: u64) -> Option<u64> {
    let hunk_header = Regex::new(r"@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@").unwrap();

    let mut position: u64 = 0;
    let mut new_line: u64 = 0;

    for line in patch.lines() {
        position += 1;

        if line.starts_with("@@") {
            if let Some(start) = hunk_header
                .captures(line)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
            {
                // Adjust for next line.
                new_line = start.saturating_sub(1);
            }
            continue;
        }

        if !line.starts_with('-') {
            new_line += 1;
            if new_line == target_line {
                return Some(position);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_line_resolves_behind_the_header() {
        let patch = "@@ -1,3 +1,4 @@\n line1\n+line2\n line3\n line4";
        // header=1, " line1"=2, "+line2"=3
        assert_eq!(resolve_diff_position(patch, 2), Some(3));
    }

    #[test]
    fn header_consumes_a_position() {
        let patch = "@@ -1,3 +1,4 @@\n line1\n+line2\n line3\n line4";
        assert_eq!(resolve_diff_position(patch, 1), Some(2));
    }

    #[test]
    fn second_hunk_resets_the_new_file_counter() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n+B\n@@ -10,3 +10,4 @@\n c\n d\n+e\n f";
        // Second header is position 5; " c" is new line 10 at position 6.
        assert_eq!(resolve_diff_position(patch, 10), Some(6));
        assert_eq!(resolve_diff_position(patch, 12), Some(8));
    }

    #[test]
    fn deletions_never_satisfy_a_match() {
        // New file line 1 is the context line after the deletion.
        let patch = "@@ -1,2 +1,1 @@\n-a\n b";
        assert_eq!(resolve_diff_position(patch, 1), Some(3));
    }

    #[test]
    fn absent_target_line_is_not_found() {
        let patch = "@@ -1,3 +1,4 @@\n line1\n+line2\n line3\n line4";
        assert_eq!(resolve_diff_position(patch, 42), None);
    }

    #[test]
    fn every_line_in_the_hunk_range_resolves_to_a_non_deletion() {
        let patch = "@@ -3,4 +7,5 @@\n ctx1\n-old\n+new1\n+new2\n ctx2\n ctx3";
        // `+7,5` covers new lines 7..=11.
        for target in 7..=11 {
            let pos = resolve_diff_position(patch, target).unwrap();
            assert!(pos >= 1);
            let line = patch.lines().nth(pos as usize - 1).unwrap();
            assert!(!line.starts_with('-'), "line {target} hit a deletion");
            assert!(!line.starts_with("@@"), "line {target} hit a header");
        }
    }

    #[test]
    fn hunk_header_without_length_fields_parses() {
        let patch = "@@ -1 +1 @@\n+only";
        assert_eq!(resolve_diff_position(patch, 1), Some(2));
    }

    #[test]
    fn missing_hunk_header_keeps_the_zero_origin() {
        // Accepted behavior: no header means lines count from an implicit
        // zero origin, which may not match the real file.
        let patch = " a\n b\n c";
        assert_eq!(resolve_diff_position(patch, 2), Some(2));
    }
}
