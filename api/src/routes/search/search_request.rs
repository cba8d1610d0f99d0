use rag_store::RetrievalMatch;
use serde::{Deserialize, Serialize};

/// Request payload for /api/search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub vector: Vec<f32>,
}

/// Response payload for /api/search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<RetrievalMatch>,
}
