use crate::errors::RagError;
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation.
///
/// Async because real providers (OpenAI, Ollama) perform HTTP requests.
/// Implement this trait to plug in another backend or an in-memory fake.
pub trait EmbeddingsProvider: Send + Sync {
    /// Converts `text` into a fixed-length vector.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}

pub mod llm;
