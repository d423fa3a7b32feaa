//! Public entry for the pull-request analysis pipeline.
//!
//! Single high-level function to run the whole pipeline for one PR:
//!
//! 1) **Step 1 — Provider I/O**
//!    - Fetch PR metadata to get `head_sha`
//!    - Fetch changed files and concatenate source-file diffs
//!
//! 2) **Step 2 — Model query**
//!    - Send the diff (plus an optional snippet hint) to the completion
//!      endpoint; an empty reply is fatal and not retried
//!
//! 3) **Step 3 — Parse & normalize**
//!    - Extract the JSON payload from the free-text reply (fenced block
//!      first, bracket scan as fallback), parse it, flatten it into a
//!      canonical issue list
//!
//! 4) **Step 4 — Persist exactly once**
//!    - Create the analysis record; the store's UNIQUE constraint on
//!      (`repository`, `pr_number`) turns a re-run into a distinguished
//!      duplicate failure instead of a second record
//!
//! 5) **Step 5 — Best-effort comments**
//!    - Resolve each issue to a diff position and post inline comments
//!      concurrently; failures are isolated per issue and never reach the
//!      caller or alter the persisted record
//!
//! The pipeline uses `tracing` for debug logging and avoids `async-trait`
//! and heap trait objects. It relies on plain `async fn` over thin
//! provider/LLM clients.

pub mod errors;
pub mod extract;
pub mod github;
pub mod normalize;
pub mod position;
pub mod prompt;
pub mod publish;

use std::time::Instant;

use tracing::{debug, error, info};

use ai_llm_service::ChatCompletionService;
use analysis_store::{AnalysisRecord, AnalysisStore};

use errors::{AnalyzerError, PrResult};
use github::{GitHubClient, ProviderConfig, PullRequestId};

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use analysis_store::{Issue, Severity};
pub use github::{ProviderConfig as ReviewerProviderConfig, PullRequestId as ReviewerPullRequestId};

/// Run the full analysis pipeline for a single pull request and return the
/// persisted record.
///
/// This is the **single public entry** to call from an HTTP handler or CLI.
/// The returned record reflects the state persisted in step 4; comment
/// outcomes from step 5 never modify it.
///
/// # Logging
/// Emits `DEBUG` logs per sub-stage (`step1`..`step5`) and one `INFO`
/// summary when the pipeline finishes.
pub async fn analyze_pull_request(
    provider_cfg: ProviderConfig,
    id: PullRequestId,
    llm: &ChatCompletionService,
    store: &AnalysisStore,
    snippet_hint: Option<String>,
) -> PrResult<AnalysisRecord> {
    let t0 = Instant::now();

    // ---------------------------
    // Step 1: provider I/O (diff)
    // ---------------------------
    debug!("step1: init github client");
    let client = GitHubClient::from_config(provider_cfg)?;

    debug!("step1: fetch pull request meta");
    let meta = client.get_pull(&id).await?;
    debug!("step1: meta ok, head_sha={}", meta.head_sha);

    debug!("step1: fetch changed files");
    let files = client.list_files(&id).await?;
    let diff = github::concat_source_diffs(&files);
    debug!(
        "step1: done files={} diff_bytes={} ({} ms)",
        files.len(),
        diff.len(),
        t0.elapsed().as_millis()
    );

    // ---------------------------
    // Step 2: model query
    // ---------------------------
    let t2 = Instant::now();
    debug!("step2: query completion endpoint");
    let review_prompt = prompt::build_review_prompt(&diff, snippet_hint.as_deref());
    let reply = llm
        .generate(&review_prompt, None)
        .await
        .map_err(AnalyzerError::from)?;
    if reply.trim().is_empty() {
        error!("step2: no analysis response received");
        return Err(AnalyzerError::EmptyResponse.into());
    }
    debug!(
        "step2: reply_bytes={} ({} ms)",
        reply.len(),
        t2.elapsed().as_millis()
    );

    // ---------------------------
    // Step 3: parse & normalize
    // ---------------------------
    let payload = match extract::extract_json_payload(&reply) {
        Some(payload) => payload,
        None => {
            error!("step3: analysis response is not in JSON format: {reply}");
            return Err(AnalyzerError::Unparsable.into());
        }
    };
    let parsed: serde_json::Value = match serde_json::from_str(&payload) {
        Ok(value) => value,
        Err(e) => {
            error!("step3: extracted payload failed to parse ({e}); raw reply: {reply}");
            return Err(AnalyzerError::Unparsable.into());
        }
    };
    let issues = normalize::to_canonical(&normalize::normalize_issues(&parsed));
    debug!("step3: issues normalized, count={}", issues.len());

    // ---------------------------
    // Step 4: persist exactly once
    // ---------------------------
    let record = AnalysisRecord::new(id.repository(), id.number, issues);
    let stored = store.create(record).await?;
    debug!("step4: analysis stored, id={}", stored.analysis_id);

    // ---------------------------
    // Step 5: best-effort comments
    // ---------------------------
    let outcomes =
        publish::publish_issue_comments(&client, &id, &meta.head_sha, &files, &stored.issues)
            .await;

    info!(
        "analysis done repository={} pr={} issues={} comments_posted={} in {} ms",
        stored.repository,
        stored.pr_number,
        stored.issues.len(),
        outcomes.iter().filter(|o| o.posted).count(),
        t0.elapsed().as_millis()
    );

    Ok(stored)
}

/// Lists every persisted analysis record (plain read-through to the store).
pub async fn list_analyses(store: &AnalysisStore) -> PrResult<Vec<AnalysisRecord>> {
    Ok(store.find_all().await?)
}
