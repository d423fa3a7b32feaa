//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_API_KEY`    = API key for the completion endpoint (mandatory)
//! - `LLM_API_URL`    = OpenAI-compatible base URL
//!                      (default: `https://api.groq.com/openai/v1`)
//! - `LLM_MODEL`      = model identifier
//!                      (default: `meta-llama/llama-4-scout-17b-16e-instruct`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, ConfigError, env_opt_u32, must_env, validate_http_endpoint},
};

const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Constructs the config for the completion profile used by PR analysis.
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(60)`
///
/// # Errors
/// - [`ConfigError::MissingVar`] when `LLM_API_KEY` is absent or empty
/// - [`ConfigError::InvalidFormat`] when `LLM_API_URL` has no http(s) scheme
/// - [`ConfigError::InvalidNumber`] when `LLM_MAX_TOKENS` is not a `u32`
pub fn config_chat_completions() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("LLM_API_KEY")?;

    let endpoint = env_or("LLM_API_URL", DEFAULT_ENDPOINT);
    validate_http_endpoint("LLM_API_URL", &endpoint)?;

    let model = env_or("LLM_MODEL", DEFAULT_MODEL);
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(60),
    })
}
