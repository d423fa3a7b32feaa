use std::path::Path;
use std::sync::Arc;

use ai_llm_service::{ChatCompletionService, config_chat_completions};
use analysis_store::AnalysisStore;

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers.
///
/// The GitHub token is deliberately absent: it arrives per request in the
/// `Authorization` header and is forwarded, never stored.
#[derive(Clone)]
pub struct AppState {
    /// API base for GitHub, e.g. "https://api.github.com".
    pub github_api_base: String,
    /// Completion client shared by all analysis requests.
    pub llm: Arc<ChatCompletionService>,
    /// Analysis record store.
    pub store: AnalysisStore,
}

impl AppState {
    /// Loads shared state from environment variables and opens the store.
    ///
    /// Env:
    /// - `GITHUB_API_BASE`  (default "https://api.github.com")
    /// - `ANALYSIS_DB_PATH` (default "code_data/analyses.db")
    /// - plus the `LLM_*` variables read by `config_chat_completions`.
    pub async fn from_env() -> AppResult<Self> {
        let github_api_base = std::env::var("GITHUB_API_BASE")
            .unwrap_or_else(|_| "https://api.github.com".into());

        let llm_cfg = config_chat_completions()?;
        let llm = Arc::new(ChatCompletionService::new(llm_cfg)?);

        let db_path = std::env::var("ANALYSIS_DB_PATH")
            .unwrap_or_else(|_| "code_data/analyses.db".into());
        if let Some(dir) = Path::new(&db_path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let store = AnalysisStore::open(&db_path).await?;

        Ok(Self {
            github_api_base,
            llm,
            store,
        })
    }
}
