//! Retrieval-augmented chat with citation tracking.
//!
//! A question plus conversation history is embedded, the nearest chunks are
//! fetched from a [`rag_store::VectorIndex`], assembled into a context block
//! with a parallel citation list, and sent to a [`CompletionProvider`]. Inline
//! `[citation: <excerpt>]` markers in the answer are then resolved back to the
//! chunks they quote.
//!
//! Entry points: [`ChatPipeline`] for answering and [`Ingestor`] for loading
//! documents into the index.

pub mod cfg;
pub mod chunk;
pub mod citations;
pub mod context;
mod error;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use cfg::{ChatPipelineConfig, IngestConfig};
pub use error::{CompletionError, IngestError, PipelineError, PromptError};
pub use ingest::{IngestRequest, IngestResponse, Ingestor};
pub use llm::{CompletionParams, CompletionProvider};
pub use pipeline::{ChatPipeline, PipelineStage};
pub use types::{
    ChatRequest, ChatResponse, ChatTurn, Citation, CitationMetadata, FALLBACK_MESSAGE, Message,
    Role,
};
