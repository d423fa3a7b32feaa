//! Best-effort comment publisher.
//!
//! Posts one inline review comment per resolvable issue. Submissions run
//! concurrently under a semaphore; outcomes are collected and logged, never
//! propagated. A failed comment must not disturb the analysis record that was
//! already persisted, and one failure must not abort the other submissions.
//!
//! Issues whose file is not in the change set, whose file has no patch, or
//! whose line cannot be resolved to a diff position are skipped silently
//! (debug-logged only).

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use analysis_store::Issue;

use crate::github::{ChangedFile, GitHubClient, PullRequestId};
use crate::position::resolve_diff_position;

/// Concurrency for comment submissions.
const MAX_CONCURRENCY: usize = 4;

/// Result for a single issue.
#[derive(Debug, Clone)]
pub struct CommentOutcome {
    /// File the comment was aimed at (if any was matched).
    pub file: Option<String>,
    /// Resolved diff position (if the line was found in the patch).
    pub position: Option<u64>,
    /// Was a comment actually posted?
    pub posted: bool,
    /// Reason if nothing was posted (unmatched file, unresolved line, error).
    pub skipped_reason: Option<String>,
}

/// Publishes comments for all issues and returns per-issue outcomes.
pub async fn publish_issue_comments(
    client: &GitHubClient,
    id: &PullRequestId,
    head_sha: &str,
    files: &[ChangedFile],
    issues: &[Issue],
) -> Vec<CommentOutcome> {
    let sem = Arc::new(Semaphore::new(MAX_CONCURRENCY));
    let mut futs = Vec::new();
    let mut outcomes = Vec::with_capacity(issues.len());

    for issue in issues {
        let matched = issue
            .file
            .as_deref()
            .and_then(|name| files.iter().find(|f| f.filename == name));

        let Some(file) = matched else {
            debug!(file = ?issue.file, "comment skipped: no matching changed file");
            outcomes.push(CommentOutcome {
                file: issue.file.clone(),
                position: None,
                posted: false,
                skipped_reason: Some("file not in change set".into()),
            });
            continue;
        };

        let Some(patch) = file.patch.as_deref() else {
            debug!(file = %file.filename, "comment skipped: no patch available");
            outcomes.push(CommentOutcome {
                file: Some(file.filename.clone()),
                position: None,
                posted: false,
                skipped_reason: Some("no patch for file".into()),
            });
            continue;
        };

        let target_line = issue.line.unwrap_or(1);
        let Some(position) = resolve_diff_position(patch, target_line) else {
            debug!(
                file = %file.filename,
                line = target_line,
                "comment skipped: line not present in diff"
            );
            outcomes.push(CommentOutcome {
                file: Some(file.filename.clone()),
                position: None,
                posted: false,
                skipped_reason: Some("line not in diff".into()),
            });
            continue;
        };

        // Make everything owned for 'static futures.
        let client = client.clone();
        let id = id.clone();
        let head_sha = head_sha.to_string();
        let path = file.filename.clone();
        let body = render_comment_body(issue);
        let sem_cloned = sem.clone();

        futs.push(tokio::spawn(async move {
            let _permit = sem_cloned.acquire_owned().await.unwrap();
            let result = client
                .create_review_comment(&id, &head_sha, &path, position, &body)
                .await;
            (path, position, result)
        }));
    }

    for fut in futs {
        match fut.await {
            Ok((path, position, Ok(()))) => outcomes.push(CommentOutcome {
                file: Some(path),
                position: Some(position),
                posted: true,
                skipped_reason: None,
            }),
            Ok((path, position, Err(e))) => {
                warn!(file = %path, position, error = %e, "comment submission failed");
                outcomes.push(CommentOutcome {
                    file: Some(path),
                    position: Some(position),
                    posted: false,
                    skipped_reason: Some(e.to_string()),
                });
            }
            Err(e) => {
                warn!(error = %e, "comment task failed to join");
                outcomes.push(CommentOutcome {
                    file: None,
                    position: None,
                    posted: false,
                    skipped_reason: Some(format!("join error: {e}")),
                });
            }
        }
    }

    let posted = outcomes.iter().filter(|o| o.posted).count();
    info!(
        posted,
        skipped = outcomes.len() - posted,
        total = outcomes.len(),
        "comment publishing done"
    );

    outcomes
}

/// Renders the Markdown body for one issue comment.
fn render_comment_body(issue: &Issue) -> String {
    let mut s = String::new();
    s.push_str("**");
    s.push_str(issue.title.as_deref().unwrap_or("Review finding"));
    s.push_str("**");
    match &issue.category {
        Some(category) => s.push_str(&format!(" ({} severity, {category})\n", issue.severity.as_str())),
        None => s.push_str(&format!(" ({} severity)\n", issue.severity.as_str())),
    }
    if let Some(description) = &issue.description {
        s.push('\n');
        s.push_str(description);
        s.push('\n');
    }
    if let Some(recommendation) = &issue.recommendation {
        s.push_str("\n**Recommendation:** ");
        s.push_str(recommendation);
        s.push('\n');
    }
    if let Some(snippet) = &issue.code_snippet {
        s.push_str("\n```\n");
        s.push_str(snippet);
        s.push_str("\n```\n");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_store::Severity;

    #[test]
    fn body_carries_title_severity_and_recommendation() {
        let issue = Issue {
            title: Some("Hardcoded secret".into()),
            description: Some("Secret is hardcoded".into()),
            recommendation: Some("Use environment variables".into()),
            severity: Severity::High,
            category: Some("security".into()),
            file: Some("a.ts".into()),
            line: Some(5),
            code_snippet: None,
        };
        let body = render_comment_body(&issue);
        assert!(body.starts_with("**Hardcoded secret** (high severity, security)"));
        assert!(body.contains("Secret is hardcoded"));
        assert!(body.contains("**Recommendation:** Use environment variables"));
    }

    #[test]
    fn body_falls_back_when_fields_are_missing() {
        let issue = Issue {
            title: None,
            description: None,
            recommendation: None,
            severity: Severity::Low,
            category: None,
            file: None,
            line: None,
            code_snippet: None,
        };
        let body = render_comment_body(&issue);
        assert!(body.starts_with("**Review finding** (low severity)"));
    }
}
