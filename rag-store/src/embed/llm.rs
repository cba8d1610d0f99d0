//! Embedding provider backed by the shared LLM service (embedding profile).

use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use tracing::warn;

use crate::{EmbeddingsProvider, RagError};

/// Embedder delegating to [`LlmServiceProfiles::embed`] and checking the dimension.
#[derive(Clone, Debug)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl LlmEmbedder {
    /// `dim` is the vector size every returned embedding must have.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>
    {
        Box::pin(async move {
            let vector = self.svc.embed(text).await?;

            if vector.len() != self.dim {
                warn!(got = vector.len(), want = self.dim, "embedding dimension mismatch");
                return Err(RagError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.dim,
                });
            }

            Ok(vector)
        })
    }
}
