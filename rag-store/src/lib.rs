//! Vector-index boundary for the RAG chat backend.
//!
//! This crate provides:
//! - [`EmbeddingsProvider`]: text → vector, with an implementation over the shared LLM service
//! - [`VectorIndex`]: top-K similarity query and upsert, with a Qdrant implementation
//! - [`RetrievalMatch`]: the scored hit handed to context assembly

mod config;
mod embed;
mod errors;
mod index;
mod qdrant_facade;

pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, llm::LlmEmbedder};
pub use errors::RagError;
pub use index::{IndexFuture, RetrievalMatch, VectorIndex};
pub use qdrant_facade::{QdrantFacade, stable_uuid};
