//! Thin LLM completion client for the PR analysis backend.
//!
//! A single non-streaming client around an OpenAI-compatible
//! `POST {endpoint}/chat/completions` API (Groq-hosted models by default),
//! with unified error types and strict env-driven configuration.
//!
//! Construct once, wrap in `Arc`, and pass clones to dependents.

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::default_config::config_chat_completions;
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use services::chat_completion_service::ChatCompletionService;
