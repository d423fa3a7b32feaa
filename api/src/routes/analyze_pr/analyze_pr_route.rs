use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use tracing::{error, info, instrument};

use analysis_store::StoreError;
use pr_reviewer::errors::{Error, ProviderError};
use pr_reviewer::github::{ProviderConfig, PullRequestId};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::{ApiResponse, FieldError};
use crate::routes::analyze_pr::analyze_pr_request::{AnalyzePrQuery, AnalyzePrRequest};

/// HTTP endpoint for analyzing a pull request.
///
/// Expects a JSON payload with `owner`, `repo` and `prNumber`, plus a GitHub
/// bearer token in the `Authorization` header. The token is forwarded to the
/// GitHub API for this one request and never stored. An optional
/// `codeSnippet` query parameter asks the model to include snippets per
/// issue.
#[instrument(name = "analyze_pr_route", skip(state, headers, body))]
pub async fn analyze_pr(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzePrQuery>,
    headers: HeaderMap,
    Json(body): Json<AnalyzePrRequest>,
) -> Response {
    // --- Validate body fields -------------------------------------------------
    let mut details = Vec::new();
    if body.owner.trim().is_empty() {
        details.push(FieldError {
            field: "owner".into(),
            message: "owner must not be empty".into(),
        });
    }
    if body.repo.trim().is_empty() {
        details.push(FieldError {
            field: "repo".into(),
            message: "repo must not be empty".into(),
        });
    }
    if !details.is_empty() {
        return ApiResponse::<()>::error("BAD_REQUEST", "Invalid request body.", details)
            .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    // --- Extract bearer token -------------------------------------------------
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return ApiResponse::<()>::error(
            "UNAUTHORIZED",
            "Authorization token is required",
            Vec::new(),
        )
        .into_response_with_status(StatusCode::UNAUTHORIZED);
    };

    // --- Run the analysis pipeline ---------------------------------------------
    let cfg = ProviderConfig {
        base_api: state.github_api_base.clone(),
        token: token.to_string(),
    };
    let id = PullRequestId {
        owner: body.owner,
        repo: body.repo,
        number: body.pr_number,
    };

    info!(
        owner = %id.owner,
        repo = %id.repo,
        number = id.number,
        "starting pull request analysis"
    );

    let result = pr_reviewer::analyze_pull_request(
        cfg,
        id.clone(),
        &state.llm,
        &state.store,
        query.code_snippet,
    )
    .await;

    match result {
        Ok(record) => ApiResponse::success(record).into_response_with_status(StatusCode::OK),
        Err(err) => {
            error!(error = %err, "pull request analysis failed");
            classify_failure(&err, &id)
        }
    }
}

/// Maps pipeline failures to distinct HTTP statuses.
///
/// Internal error shapes never leak: everything unclassified collapses into
/// one generic message.
fn classify_failure(err: &Error, id: &PullRequestId) -> Response {
    match err {
        Error::Provider(ProviderError::NotFound) => ApiResponse::<()>::error(
            "PR_NOT_FOUND",
            format!(
                "Pull Request #{} not found in {}/{}",
                id.number, id.owner, id.repo
            ),
            Vec::new(),
        )
        .into_response_with_status(StatusCode::NOT_FOUND),

        Error::Provider(ProviderError::Forbidden | ProviderError::Unauthorized) => {
            ApiResponse::<()>::error(
                "ACCESS_DENIED",
                format!("Access denied to PR #{}", id.number),
                Vec::new(),
            )
            .into_response_with_status(StatusCode::FORBIDDEN)
        }

        Error::Store(StoreError::Duplicate) => ApiResponse::<()>::error(
            "ALREADY_ANALYZED",
            "PR already analyzed for this repository.",
            Vec::new(),
        )
        .into_response_with_status(StatusCode::BAD_REQUEST),

        _ => ApiResponse::<()>::error(
            "INTERNAL_ERROR",
            "Something went wrong while analyzing the pull request.",
            Vec::new(),
        )
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
