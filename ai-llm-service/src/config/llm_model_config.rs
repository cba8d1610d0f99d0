use crate::config::llm_provider::LlmProvider;

/// Configuration for one model profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: Which backend to call.
/// - `model`: The model identifier (e.g. `"gpt-4-turbo-preview"`, `"text-embedding-3-small"`).
/// - `endpoint`: Base URL of the API (without the `/v1/...` suffix).
/// - `api_key`: Optional API key for providers that require authentication.
/// - `max_tokens`: Default generation budget (chat profiles only).
/// - `temperature`: Default sampling temperature (chat profiles only).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
