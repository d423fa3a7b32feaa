//! HTTP surface for the PR analysis backend.

use std::sync::Arc;

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{Router, middleware, routing::post};
use tokio::signal;

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};
use crate::middleware_layer::json_extractor::json_error_mapper;
use crate::routes::analyze_pr::{
    analyze_pr_route::analyze_pr, list_analyses_route::list_analyses,
};

/// Builds shared state from the environment and serves the API until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let host_url =
        std::env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env().await?);

    let app = Router::new()
        .route("/api/analyze-pr", post(analyze_pr).get(list_analyses))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;

    tracing::info!("listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
