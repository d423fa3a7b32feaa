//! GitHub-side data model for pull requests and changed files.
//!
//! These types are the normalized output of the provider layer and are
//! consumed by the orchestrator and the comment publisher.

use serde::{Deserialize, Serialize};

/// A unique reference to a pull request inside GitHub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestId {
    pub owner: String,
    pub repo: String,
    /// Pull request number (not the internal node id).
    pub number: u64,
}

impl PullRequestId {
    /// `owner/repo` composite key, the shape the analysis store indexes on.
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Minimal PR metadata. `head_sha` binds review comments to the diff.
#[derive(Debug, Clone)]
pub struct PullRequestMeta {
    pub head_sha: String,
    pub state: String,
    pub title: String,
}

/// One changed file with its optional unified-diff patch.
///
/// `patch` is `None` for binary or rename-only changes; such files never
/// contribute to the review diff and never receive comments.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub filename: String,
    pub patch: Option<String>,
}
