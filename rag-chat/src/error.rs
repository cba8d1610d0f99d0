//! Typed errors for the rag-chat crate.

use std::time::Duration;

use serde_json::error::Category;
use thiserror::Error;

use crate::pipeline::PipelineStage;

/// Prompt construction failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// There is no final turn to attach the context to.
    #[error("conversation history is empty")]
    EmptyHistory,
}

/// Failure reported by a [`crate::CompletionProvider`].
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Errors from the shared LLM service.
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Any other backend failure.
    #[error("{0}")]
    Other(String),
}

/// Why a chat request ended in the `Failed` state.
///
/// `Display` carries the full cause for logs; [`PipelineError::user_message`]
/// is the short text placed in the response envelope.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("embedding failed: {0}")]
    Embedding(#[source] rag_store::RagError),

    #[error("vector index query failed: {0}")]
    IndexQuery(#[source] rag_store::RagError),

    #[error("completion failed: {0}")]
    Completion(#[source] CompletionError),

    #[error("{stage} stage timed out after {after:?}")]
    Timeout { stage: PipelineStage, after: Duration },
}

impl PipelineError {
    /// Stage at which the pipeline failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Validation(_) => PipelineStage::Received,
            PipelineError::Embedding(_) => PipelineStage::Embedding,
            PipelineError::IndexQuery(_) => PipelineStage::Retrieving,
            PipelineError::Completion(_) => PipelineStage::Completing,
            PipelineError::Timeout { stage, .. } => *stage,
        }
    }

    /// Short human message for the `error` field of the envelope.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(detail) => format!("Invalid request: {detail}"),
            PipelineError::Embedding(_) => "Failed to generate embedding".into(),
            PipelineError::IndexQuery(_) => "Failed to search vectors".into(),
            PipelineError::Completion(_) => "Failed to generate completion".into(),
            PipelineError::Timeout { .. } => "Request timed out".into(),
        }
    }
}

impl From<PromptError> for PipelineError {
    fn from(e: PromptError) -> Self {
        PipelineError::Validation(e.to_string())
    }
}

/// Position-free summary of a rejected JSON body; `shape` names what was expected.
pub(crate) fn rejected_body(e: &serde_json::Error, shape: &str) -> String {
    match e.classify() {
        Category::Data => format!("expected {shape}"),
        Category::Syntax | Category::Eof | Category::Io => "body is not valid JSON".into(),
    }
}

/// Document ingestion failure.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid document: {0}")]
    Validation(String),

    #[error("failed to prepare vector index: {0}")]
    Prepare(#[source] rag_store::RagError),

    #[error("failed to embed chunk {chunk_id}: {source}")]
    Embedding {
        chunk_id: String,
        #[source]
        source: rag_store::RagError,
    },

    #[error("failed to store chunk {chunk_id}: {source}")]
    Upsert {
        chunk_id: String,
        #[source]
        source: rag_store::RagError,
    },
}

impl IngestError {
    pub fn is_validation(&self) -> bool {
        matches!(self, IngestError::Validation(_))
    }

    /// Short human message for API responses.
    pub fn user_message(&self) -> String {
        match self {
            IngestError::Validation(detail) => format!("Invalid document: {detail}"),
            IngestError::Prepare(_) => "Failed to prepare vector index".into(),
            IngestError::Embedding { .. } => "Failed to generate embedding".into(),
            IngestError::Upsert { .. } => "Failed to store chunk".into(),
        }
    }
}
