//! Maps axum's built-in extractor rejections into the response envelope.
//!
//! A missing or mistyped body field otherwise surfaces as a bare-text
//! 400/415/422; clients of this API always receive the JSON envelope.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::core::http::response_envelope::{ApiResponse, FieldError};

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

/// Best-effort guess of the offending field from serde's error message.
fn guess_field_from_serde_msg(msg: &str) -> Option<String> {
    for key in ["owner", "repo", "prNumber"] {
        if msg.contains(key) {
            return Some(key.to_string());
        }
    }
    None
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    // Only extractor-produced statuses are rewrapped; everything else is
    // already enveloped by the handlers.
    let remap = matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    if !remap {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    let original = String::from_utf8_lossy(&bytes);

    // Handlers emit the envelope themselves; leave their bodies alone.
    if original.contains("\"success\":") {
        return Response::from_parts(parts, bytes.into());
    }

    let details = match guess_field_from_serde_msg(&original) {
        Some(field) => vec![FieldError {
            field,
            message: original.trim().to_string(),
        }],
        None => Vec::new(),
    };

    let envelope =
        ApiResponse::<()>::error("BAD_REQUEST", original.trim().to_string(), details);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.status = StatusCode::BAD_REQUEST;

    Response::from_parts(parts, body.into())
}
