//! End-to-end pipeline test against mock GitHub and completion endpoints.
//!
//! Exercises: diff fetch, model query, JSON extraction, persist-once
//! semantics, and best-effort comment publishing with per-issue failure
//! isolation.

use ai_llm_service::{ChatCompletionService, LlmModelConfig};
use analysis_store::{AnalysisStore, StoreError};
use mockito::Matcher;
use pr_reviewer::errors::{Error, ProviderError};
use pr_reviewer::github::{ProviderConfig, PullRequestId};
use serde_json::json;

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("analyses.db");
    path.to_string_lossy().to_string()
}

fn llm_service(endpoint: &str) -> ChatCompletionService {
    ChatCompletionService::new(LlmModelConfig {
        model: "test-model".into(),
        endpoint: endpoint.to_string(),
        api_key: Some("test-key".into()),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(5),
    })
    .unwrap()
}

fn pr_id() -> PullRequestId {
    PullRequestId {
        owner: "test-owner".into(),
        repo: "test-repo".into(),
        number: 7,
    }
}

fn completion_body(content: &str) -> String {
    json!({"choices": [{"message": {"content": content}}]}).to_string()
}

/// Registers the GET mocks every pipeline run needs.
async fn mock_pull_and_files(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let pull = server
        .mock("GET", "/repos/test-owner/test-repo/pulls/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"state": "open", "title": "Add feature", "head": {"sha": "abc123"}}).to_string(),
        )
        .create_async()
        .await;

    let files = server
        .mock("GET", "/repos/test-owner/test-repo/pulls/7/files")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "filename": "src/index.js",
                    "patch": "@@ -1,3 +1,4 @@\n line1\n+line2\n line3\n line4"
                },
                {
                    "filename": "src/other.js",
                    "patch": "@@ -1,2 +1,3 @@\n a\n+b\n c"
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    (pull, files)
}

#[tokio::test]
async fn analyze_persists_once_and_isolates_comment_failures() {
    let mut server = mockito::Server::new_async().await;
    let (_pull, _files) = mock_pull_and_files(&mut server).await;

    // Two issues, one per file; the reply wraps them in a fenced block.
    let reply = "Found problems.\n```json\n[\
        {\"title\":\"X\",\"severity\":\"high\",\"file\":\"src/index.js\",\"line\":2},\
        {\"title\":\"Y\",\"severity\":\"low\",\"fileLocation\":\"src/other.js\",\"lineNumber\":2}\
    ]\n```";
    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(reply))
        .create_async()
        .await;

    // One comment succeeds, the other fails server-side.
    let ok_comment = server
        .mock("POST", "/repos/test-owner/test-repo/pulls/7/comments")
        .match_body(Matcher::PartialJson(json!({"path": "src/index.js"})))
        .with_status(201)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let failing_comment = server
        .mock("POST", "/repos/test-owner/test-repo/pulls/7/comments")
        .match_body(Matcher::PartialJson(json!({"path": "src/other.js"})))
        .with_status(500)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let store = AnalysisStore::open(&temp_db_path()).await.unwrap();
    let llm = llm_service(&server.url());
    let cfg = ProviderConfig {
        base_api: server.url(),
        token: "test-token".into(),
    };

    let record = pr_reviewer::analyze_pull_request(cfg.clone(), pr_id(), &llm, &store, None)
        .await
        .unwrap();

    // The failed comment does not shrink the persisted record.
    assert_eq!(record.repository, "test-owner/test-repo");
    assert_eq!(record.pr_number, 7);
    assert_eq!(record.issues.len(), 2);
    assert_eq!(record.issues[0].title.as_deref(), Some("X"));
    assert_eq!(record.issues[1].file.as_deref(), Some("src/other.js"));
    assert_eq!(record.issues[1].line, Some(2));

    // Both submissions were attempted despite one failing.
    ok_comment.assert_async().await;
    failing_comment.assert_async().await;

    // Second run of the same PR: classified as duplicate, no second record.
    let err = pr_reviewer::analyze_pull_request(cfg, pr_id(), &llm, &store, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Duplicate)), "got: {err:?}");

    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn unresolvable_issues_are_silently_skipped() {
    let mut server = mockito::Server::new_async().await;
    let (_pull, _files) = mock_pull_and_files(&mut server).await;

    // One issue points at a line outside the diff, one at an unknown file.
    let reply = "```json\n[\
        {\"title\":\"A\",\"file\":\"src/index.js\",\"line\":999},\
        {\"title\":\"B\",\"file\":\"src/missing.js\",\"line\":1}\
    ]\n```";
    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(reply))
        .create_async()
        .await;

    let no_comments = server
        .mock("POST", "/repos/test-owner/test-repo/pulls/7/comments")
        .expect(0)
        .create_async()
        .await;

    let store = AnalysisStore::open(&temp_db_path()).await.unwrap();
    let llm = llm_service(&server.url());
    let cfg = ProviderConfig {
        base_api: server.url(),
        token: "test-token".into(),
    };

    let record = pr_reviewer::analyze_pull_request(cfg, pr_id(), &llm, &store, None)
        .await
        .unwrap();

    // The analysis still records both issues; only the comments are skipped.
    assert_eq!(record.issues.len(), 2);
    no_comments.assert_async().await;
}

#[tokio::test]
async fn unparsable_reply_is_fatal_and_persists_nothing() {
    let mut server = mockito::Server::new_async().await;
    let (_pull, _files) = mock_pull_and_files(&mut server).await;

    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body("I could not find any structured issues."))
        .create_async()
        .await;

    let store = AnalysisStore::open(&temp_db_path()).await.unwrap();
    let llm = llm_service(&server.url());
    let cfg = ProviderConfig {
        base_api: server.url(),
        token: "test-token".into(),
    };

    let err = pr_reviewer::analyze_pull_request(cfg, pr_id(), &llm, &store, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Analyzer(_)), "got: {err:?}");

    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_model_reply_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let (_pull, _files) = mock_pull_and_files(&mut server).await;

    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(""))
        .create_async()
        .await;

    let store = AnalysisStore::open(&temp_db_path()).await.unwrap();
    let llm = llm_service(&server.url());
    let cfg = ProviderConfig {
        base_api: server.url(),
        token: "test-token".into(),
    };

    let err = pr_reviewer::analyze_pull_request(cfg, pr_id(), &llm, &store, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Analyzer(_)), "got: {err:?}");
}

#[tokio::test]
async fn missing_pull_request_maps_to_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _pull = server
        .mock("GET", "/repos/test-owner/test-repo/pulls/7")
        .with_status(404)
        .with_body(json!({"message": "Not Found"}).to_string())
        .create_async()
        .await;

    let store = AnalysisStore::open(&temp_db_path()).await.unwrap();
    let llm = llm_service(&server.url());
    let cfg = ProviderConfig {
        base_api: server.url(),
        token: "test-token".into(),
    };

    let err = pr_reviewer::analyze_pull_request(cfg, pr_id(), &llm, &store, None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Provider(ProviderError::NotFound)),
        "got: {err:?}"
    );
}
