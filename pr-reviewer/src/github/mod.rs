//! GitHub provider (REST v3) for PR metadata, changed files and review
//! comments.
//!
//! Endpoints used:
//! - GET  /repos/{owner}/{repo}/pulls/{number}
//! - GET  /repos/{owner}/{repo}/pulls/{number}/files  (field "patch" is unified diff)
//! - POST /repos/{owner}/{repo}/pulls/{number}/comments

pub mod types;
pub use types::*;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{Error, PrResult};

/// Runtime configuration for the GitHub client.
///
/// The token is call-scoped: each analysis request builds its own client from
/// the caller-supplied bearer token. Nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Access token for the GitHub API (caller-supplied bearer token).
    pub token: String,
}

/// File extensions treated as reviewable source code. Everything else is
/// excluded from the concatenated diff sent to the model.
const SOURCE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "rs", "py", "go", "java", "kt", "rb", "c", "h", "cc", "cpp", "hpp",
    "cs", "php", "swift", "dart",
];

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    headers: HeaderMap,
}

impl GitHubClient {
    /// Constructs a client from generic config.
    pub fn from_config(cfg: ProviderConfig) -> PrResult<Self> {
        let http = Client::builder().user_agent("pr-ai-backend/0.1").build()?;
        let headers = build_github_headers(&cfg.token)?;
        Ok(Self {
            http,
            base_api: cfg.base_api.trim_end_matches('/').to_string(),
            headers,
        })
    }

    /// Fetches PR metadata. The head SHA is required to place review
    /// comments; 404/403/401 map to the distinct provider error variants.
    pub async fn get_pull(&self, id: &PullRequestId) -> PrResult<PullRequestMeta> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, id.owner, id.repo, id.number
        );
        let resp: GitHubPull = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(PullRequestMeta {
            head_sha: resp.head.sha,
            state: resp.state,
            title: resp.title,
        })
    }

    /// Lists the files changed in the PR, with unified-diff patches where
    /// GitHub provides them.
    pub async fn list_files(&self, id: &PullRequestId) -> PrResult<Vec<ChangedFile>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files",
            self.base_api, id.owner, id.repo, id.number
        );
        let raw: Vec<GitHubPullFile> = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(raw
            .into_iter()
            .map(|f| ChangedFile {
                filename: f.filename,
                patch: f.patch,
            })
            .collect())
    }

    /// Posts one inline review comment at an already-resolved diff position.
    pub async fn create_review_comment(
        &self,
        id: &PullRequestId,
        commit_id: &str,
        path: &str,
        position: u64,
        body: &str,
    ) -> PrResult<()> {
        #[derive(serde::Serialize)]
        struct Req<'a> {
            body: &'a str,
            commit_id: &'a str,
            path: &'a str,
            position: u64,
        }

        let url = format!(
            "{}/repos/{}/{}/pulls/{}/comments",
            self.base_api, id.owner, id.repo, id.number
        );
        debug!("comment POST path={} position={}", path, position);

        self.http
            .post(&url)
            .headers(self.headers.clone())
            .json(&Req {
                body,
                commit_id,
                path,
                position,
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Concatenates the unified diffs of reviewable source files.
///
/// Files with no patch (binary or rename-only changes) are skipped. Each
/// section is prefixed with its filename so the model can attribute findings;
/// the result is empty when no source file changed.
pub fn concat_source_diffs(files: &[ChangedFile]) -> String {
    let mut sections = Vec::new();
    for file in files {
        if !is_source_file(&file.filename) {
            continue;
        }
        if let Some(patch) = &file.patch {
            sections.push(format!("File: {}\n{}", file.filename, patch));
        }
    }
    sections.join("\n\n")
}

fn is_source_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn build_github_headers(token: &str) -> PrResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("pr-ai-backend/0.1"));
    let auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::Validation("token is not a valid header value".into()))?;
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

/// --- GitHub response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct GitHubPull {
    state: String,
    title: String,
    head: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPullFile {
    filename: String,
    #[serde(default)]
    patch: Option<String>, // unified diff; None for binary/rename-only
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, patch: Option<&str>) -> ChangedFile {
        ChangedFile {
            filename: name.to_string(),
            patch: patch.map(str::to_string),
        }
    }

    #[test]
    fn non_source_and_patchless_files_are_skipped() {
        let files = vec![
            file("src/a.ts", Some("@@ -1 +1 @@\n+a")),
            file("logo.png", Some("binary")),
            file("src/renamed.ts", None),
            file("README", Some("@@ -1 +1 @@\n+x")),
        ];
        let diff = concat_source_diffs(&files);
        assert_eq!(diff, "File: src/a.ts\n@@ -1 +1 @@\n+a");
    }

    #[test]
    fn sections_are_joined_with_blank_lines() {
        let files = vec![
            file("a.js", Some("patch-a")),
            file("b.rs", Some("patch-b")),
        ];
        let diff = concat_source_diffs(&files);
        assert_eq!(diff, "File: a.js\npatch-a\n\nFile: b.rs\npatch-b");
    }

    #[test]
    fn no_source_changes_yield_an_empty_string() {
        assert_eq!(concat_source_diffs(&[file("image.svg", Some("p"))]), "");
        assert_eq!(concat_source_diffs(&[]), "");
    }
}
