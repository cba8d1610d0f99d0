//! Nearest-neighbour index boundary.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::errors::RagError;

/// Boxed future returned by [`VectorIndex`] methods.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// One scored hit from a nearest-neighbour query.
///
/// `metadata` is whatever was stored at upsert time (chunk text plus provenance);
/// it is `Null` when the query asked for no metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub id: String,
    /// Higher is more relevant.
    pub score: f32,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Stores `(vector, metadata)` pairs and answers top-K similarity queries.
pub trait VectorIndex: Send + Sync {
    /// Returns at most `top_k` matches, best first.
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> IndexFuture<'a, Vec<RetrievalMatch>>;

    /// Inserts or replaces the point identified by `id`.
    fn upsert<'a>(
        &'a self,
        id: &'a str,
        vector: Vec<f32>,
        metadata: serde_json::Value,
    ) -> IndexFuture<'a, ()>;

    /// Makes sure the backing storage exists before the first upsert.
    fn prepare<'a>(&'a self) -> IndexFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }
}
