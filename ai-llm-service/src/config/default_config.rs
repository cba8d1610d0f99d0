//! Default model configs loaded from environment variables.
//!
//! Two roles are exposed:
//!
//! - **Chat**      → completion model used to answer questions
//! - **Embedding** → embedding generator for queries and ingested chunks
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `openai` (default) or `ollama`
//! - `LLM_MAX_TOKENS`    = chat generation budget (default `500`)
//! - `LLM_TEMPERATURE`   = chat temperature (default `0.7`)
//! - `LLM_TIMEOUT_SECS`  = request timeout (default `60`)
//! - `CHAT_MODEL`        = chat model (default `gpt-4-turbo-preview`)
//! - `EMBEDDING_MODEL`   = embedding model (default `text-embedding-3-small`)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`    = API key (mandatory for `openai`)
//! - `OPENAI_BASE_URL`   = base URL (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory for `ollama`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_parse, env_opt_u32, env_or, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolves the provider from `LLM_KIND` (default `openai`).
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    Ok(env_or("LLM_KIND", "openai").parse::<LlmProvider>()?)
}

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", url.trim())?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Endpoint + API key for the given provider.
fn endpoint_and_key(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
        LlmProvider::OpenAI => {
            let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
            validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
            let key = must_env("OPENAI_API_KEY")?;
            Ok((endpoint, Some(key)))
        }
    }
}

fn model_from_env(var: &'static str, default: &str) -> Result<String, AiLlmError> {
    let model = env_or(var, default);
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    Ok(model)
}

/// Constructs the **chat** profile.
///
/// # Defaults
/// - `temperature = 0.7`
/// - `max_tokens = 500`
/// - `timeout_secs = 60`
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let model = model_from_env("CHAT_MODEL", DEFAULT_CHAT_MODEL)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature =
        env_opt_parse::<f32>("LLM_TEMPERATURE", "expected f32")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let timeout_secs = env_opt_parse::<u64>("LLM_TIMEOUT_SECS", "expected u64")?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Constructs the **embedding** profile.
///
/// # Defaults
/// - `timeout_secs = 30`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let model = model_from_env("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL)?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}
