use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for chat completions and embeddings.
///
/// Parsed from `LLM_KIND` (`openai` / `chatgpt`, `ollama`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI-compatible REST API.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("OpenAI".parse::<LlmProvider>().ok(), Some(LlmProvider::OpenAI));
        assert_eq!(" ollama ".parse::<LlmProvider>().ok(), Some(LlmProvider::Ollama));
        assert!("anthropic".parse::<LlmProvider>().is_err());
    }
}
