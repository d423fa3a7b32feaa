use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::error;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;

/// Returns every stored analysis record.
pub async fn list_analyses(State(state): State<Arc<AppState>>) -> Response {
    match pr_reviewer::list_analyses(&state.store).await {
        Ok(records) => ApiResponse::success(records).into_response_with_status(StatusCode::OK),
        Err(err) => {
            error!(error = %err, "failed to list analyses");
            ApiResponse::<()>::error("INTERNAL_ERROR", "Failed to load analyses.", Vec::new())
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
