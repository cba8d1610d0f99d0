//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Vector dimensionality differs from the configured space.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Metadata handed to `upsert` was not a JSON object.
    #[error("metadata must be a JSON object")]
    MetadataNotObject,

    /// Embedding backend failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] ai_llm_service::AiLlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
