use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use rag_chat::{
    ChatPipeline, ChatPipelineConfig, CompletionProvider, IngestConfig, Ingestor,
};
use rag_store::{EmbeddingsProvider, LlmEmbedder, QdrantFacade, RagConfig, VectorIndex};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ChatPipeline,
    pub ingestor: Ingestor,
    /// Used directly by `/api/embed`.
    pub embedder: Arc<dyn EmbeddingsProvider>,
    /// Used directly by `/api/search`.
    pub index: Arc<dyn VectorIndex>,
    /// Probed by `/health`; absent when collaborators are not LLM-backed.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    /// Wires the pipeline and ingestor over the given collaborators.
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
        completer: Arc<dyn CompletionProvider>,
        llm: Option<Arc<LlmServiceProfiles>>,
        chat_cfg: ChatPipelineConfig,
        ingest_cfg: IngestConfig,
    ) -> Self {
        Self {
            pipeline: ChatPipeline::new(embedder.clone(), index.clone(), completer, chat_cfg),
            ingestor: Ingestor::new(embedder.clone(), index.clone(), ingest_cfg),
            embedder,
            index,
            llm,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Fails on invalid LLM or Qdrant configuration.
    pub fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let rag_cfg = RagConfig::from_env()?;

        let embedder = Arc::new(LlmEmbedder::new(llm.clone(), rag_cfg.space.size));
        let index = Arc::new(QdrantFacade::new(&rag_cfg)?);

        let (chat, embedding) = llm.profiles();
        info!(
            chat_model = %chat.model,
            embedding_model = %embedding.model,
            collection = %rag_cfg.collection,
            dim = rag_cfg.space.size,
            "application state initialized"
        );

        Ok(Self::new(
            embedder,
            index,
            llm.clone(),
            Some(llm),
            ChatPipelineConfig::from_env(),
            IngestConfig::from_env(),
        ))
    }
}
