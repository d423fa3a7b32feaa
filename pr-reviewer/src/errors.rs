//! Crate-wide error hierarchy for pr-reviewer.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Provider-aware mapping (401→Unauthorized, 404→NotFound, 5xx→Server, etc.).
//! - No dynamic dispatch, no async-trait, ergonomic `?` via `From` impls.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type PrResult<T> = Result<T, Error>;

/// Root error type for the pr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Completion-model related failure.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// Persistence failure (duplicate analysis included).
    #[error(transparent)]
    Store(#[from] analysis_store::StoreError),

    /// Input validation errors (bad tokens, malformed IDs, etc.).
    #[error("validation error: {0}")]
    Validation(String),

    /// Generic catch-all error when nothing else fits.
    #[error("other error: {0}")]
    Other(String),
}

/// Detailed provider-specific error used inside the GitHub layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (4xx/3xx) not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// JSON deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures of the review-analysis step (model call + response parsing).
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The model returned nothing usable. Fatal, not retried.
    #[error("no analysis response received")]
    EmptyResponse,

    /// The completion call itself failed upstream; message is propagated.
    #[error("analysis failed upstream: {0}")]
    Upstream(String),

    /// The model's text contains no recoverable JSON. The raw text is logged
    /// at the call site, never surfaced to the caller.
    #[error("analysis response not parsable")]
    Unparsable,
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => ProviderError::Unauthorized,
                403 => ProviderError::Forbidden,
                404 => ProviderError::NotFound,
                429 => ProviderError::RateLimited {
                    retry_after_secs: None,
                },
                500..=599 => ProviderError::Server(code),
                _ => ProviderError::HttpStatus(code),
            };
        }
        ProviderError::Network(e.to_string())
    }
}

impl From<ai_llm_service::AiLlmError> for AnalyzerError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        use ai_llm_service::error_handler::ProviderError as LlmError;
        match e {
            ai_llm_service::AiLlmError::Provider(LlmError::EmptyChoices) => {
                AnalyzerError::EmptyResponse
            }
            ai_llm_service::AiLlmError::Provider(LlmError::Upstream(message)) => {
                AnalyzerError::Upstream(message)
            }
            other => AnalyzerError::Upstream(other.to_string()),
        }
    }
}

impl From<ai_llm_service::AiLlmError> for Error {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        Error::Analyzer(AnalyzerError::from(e))
    }
}
