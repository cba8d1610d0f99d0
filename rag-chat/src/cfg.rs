//! Runtime configuration loaded from environment variables.

use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use crate::chunk::DEFAULT_CHUNK_CHARS;
use crate::llm::CompletionParams;

const DEFAULT_CALL_TIMEOUT_SECS: NonZeroU64 = match NonZeroU64::new(30) {
    Some(v) => v,
    None => unreachable!(),
};

/// Knobs for [`crate::ChatPipeline`]. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatPipelineConfig {
    /// Matches requested from the vector index.
    pub top_k: u64,
    pub completion: CompletionParams,
    /// Upper bound for each external call (embed, query, complete).
    pub call_timeout: Duration,
}

impl Default for ChatPipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            completion: CompletionParams::default(),
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS.get()),
        }
    }
}

impl ChatPipelineConfig {
    /// Reads `LLM_TEMPERATURE`, `LLM_MAX_TOKENS` and `PIPELINE_CALL_TIMEOUT_SECS`.
    /// Unset or unparsable values keep their defaults; a zero timeout is unparsable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            top_k: d.top_k,
            completion: CompletionParams {
                temperature: parse("LLM_TEMPERATURE", d.completion.temperature),
                max_tokens: parse("LLM_MAX_TOKENS", d.completion.max_tokens),
            },
            call_timeout: Duration::from_secs(
                parse("PIPELINE_CALL_TIMEOUT_SECS", DEFAULT_CALL_TIMEOUT_SECS).get(),
            ),
        }
    }
}

/// Knobs for [`crate::Ingestor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestConfig {
    pub chunk_max_chars: NonZeroUsize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_max_chars: DEFAULT_CHUNK_CHARS,
        }
    }
}

impl IngestConfig {
    /// Reads `CHUNK_MAX_CHARS`; zero or garbage keeps the default.
    pub fn from_env() -> Self {
        Self {
            chunk_max_chars: parse("CHUNK_MAX_CHARS", DEFAULT_CHUNK_CHARS),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    parse_raw(std::env::var(k).ok().as_deref(), dflt)
}

fn parse_raw<T: std::str::FromStr>(raw: Option<&str>, dflt: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ChatPipelineConfig::default();
        assert_eq!(c.top_k, 3);
        assert_eq!(c.completion.max_tokens, 500);
        assert_eq!(c.call_timeout, Duration::from_secs(30));
        assert_eq!(IngestConfig::default().chunk_max_chars.get(), 1000);
    }

    #[test]
    fn parse_falls_back_on_missing_or_bad_values() {
        assert_eq!(parse("RAG_CHAT_TEST_SURELY_UNSET_VAR", 7u32), 7);
        assert_eq!(
            parse::<NonZeroUsize>("RAG_CHAT_TEST_SURELY_UNSET_VAR", DEFAULT_CHUNK_CHARS),
            DEFAULT_CHUNK_CHARS
        );
    }

    #[test]
    fn zero_call_timeout_keeps_default() {
        assert_eq!(parse_raw(Some("0"), DEFAULT_CALL_TIMEOUT_SECS).get(), 30);
        assert_eq!(parse_raw(Some(" 5 "), DEFAULT_CALL_TIMEOUT_SECS).get(), 5);
        assert_eq!(parse_raw(Some("soon"), DEFAULT_CALL_TIMEOUT_SECS).get(), 30);
        assert_eq!(parse_raw(Some("0"), DEFAULT_CHUNK_CHARS), DEFAULT_CHUNK_CHARS);
    }
}
