//! Document ingestion: chunk, embed each chunk, upsert with provenance.

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, VectorIndex};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::cfg::IngestConfig;
use crate::chunk::chunk_document;
use crate::error::{IngestError, rejected_body};

/// Body of `POST /api/ingest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub content: String,
    pub file_name: String,
}

/// Result of an ingestion request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub chunks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestResponse {
    pub fn ok(chunks: usize) -> Self {
        Self {
            success: true,
            chunks,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            chunks: 0,
            error: Some(error.into()),
        }
    }
}

/// Writes documents into the vector index so the chat pipeline can retrieve them.
#[derive(Clone)]
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<dyn VectorIndex>,
    cfg: IngestConfig,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
        cfg: IngestConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            cfg,
        }
    }

    /// Chunks `doc.content`, then embeds and upserts every chunk in order.
    ///
    /// Each point stores `{text, chunkId, fileName, chunkIndex, timestamp}`.
    /// Returns the number of chunks written; stops at the first failing chunk.
    ///
    /// # Errors
    /// - [`IngestError::Validation`] if `fileName` is blank
    /// - [`IngestError::Prepare`] if the index cannot be prepared
    /// - [`IngestError::Embedding`] / [`IngestError::Upsert`] naming the failing chunk
    #[instrument(skip_all, fields(file_name = %doc.file_name, content_chars = doc.content.chars().count()))]
    pub async fn ingest(&self, doc: &IngestRequest) -> Result<usize, IngestError> {
        let file_name = doc.file_name.trim();
        if file_name.is_empty() {
            return Err(IngestError::Validation("fileName must not be empty".into()));
        }

        let chunks = chunk_document(file_name, &doc.content, self.cfg.chunk_max_chars);
        if chunks.is_empty() {
            info!("document is empty, nothing to ingest");
            return Ok(0);
        }

        self.index.prepare().await.map_err(IngestError::Prepare)?;

        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        for chunk in &chunks {
            let vector = self
                .embedder
                .embed(&chunk.text)
                .await
                .map_err(|source| IngestError::Embedding {
                    chunk_id: chunk.chunk_id.clone(),
                    source,
                })?;

            let metadata = json!({
                "text": chunk.text,
                "chunkId": chunk.chunk_id,
                "fileName": file_name,
                "chunkIndex": chunk.index,
                "timestamp": timestamp,
            });

            self.index
                .upsert(&chunk.chunk_id, vector, metadata)
                .await
                .map_err(|source| IngestError::Upsert {
                    chunk_id: chunk.chunk_id.clone(),
                    source,
                })?;
            debug!(chunk_id = %chunk.chunk_id, "chunk stored");
        }

        info!(chunks = chunks.len(), "document ingested");
        Ok(chunks.len())
    }

    /// Validates a raw JSON body, ingests it and wraps the outcome.
    pub async fn handle(&self, payload: serde_json::Value) -> Result<IngestResponse, IngestError> {
        let doc: IngestRequest = serde_json::from_value(payload)
            .map_err(|e| {
                warn!(error = %e, "ingest payload rejected");
                IngestError::Validation(rejected_body(&e, "{content, fileName}"))
            })?;
        let n = self.ingest(&doc).await?;
        Ok(IngestResponse::ok(n))
    }
}
