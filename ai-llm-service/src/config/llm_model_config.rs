/// Configuration for a completion-model invocation.
///
/// One struct covers everything the client needs; extend as new knobs become
/// necessary.
///
/// # Fields
///
/// - `model`: the model identifier (e.g. `"meta-llama/llama-4-scout-17b-16e-instruct"`).
/// - `endpoint`: OpenAI-compatible API base (e.g. `"https://api.groq.com/openai/v1"`).
/// - `api_key`: API key for endpoints that require authentication.
/// - `max_tokens`: maximum number of tokens to generate (if supported).
/// - `temperature`: controls randomness (0.0 = deterministic).
/// - `top_p`: nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// OpenAI-compatible API base URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
