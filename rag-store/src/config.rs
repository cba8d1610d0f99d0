//! Runtime and collection configuration.

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";
pub const DEFAULT_COLLECTION: &str = "rag_chunks";
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for the Qdrant-backed vector index.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Vector size and distance of the collection.
    pub space: VectorSpace,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl RagConfig {
    /// Creates a default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            space: VectorSpace {
                size: DEFAULT_EMBEDDING_DIM,
                distance: DistanceKind::Cosine,
            },
            exact_search: false,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION` and `EMBEDDING_DIM`.
    ///
    /// # Errors
    /// Returns `RagError::Config` if `EMBEDDING_DIM` is not a positive integer
    /// or the resulting config fails [`RagConfig::validate`].
    pub fn from_env() -> Result<Self, RagError> {
        let url = env_or("QDRANT_URL", DEFAULT_QDRANT_URL);
        let collection = env_or("QDRANT_COLLECTION", DEFAULT_COLLECTION);
        let mut cfg = Self::new_default(url, collection);

        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        if let Ok(raw) = std::env::var("EMBEDDING_DIM") {
            if !raw.trim().is_empty() {
                cfg.space.size = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| RagError::Config(format!("EMBEDDING_DIM is not a number: {raw}")))?;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.space.size == 0 {
            return Err(RagError::Config("vector size must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RagConfig::new_default(DEFAULT_QDRANT_URL, DEFAULT_COLLECTION);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.space.size, 1536);
        assert_eq!(cfg.space.distance, DistanceKind::Cosine);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let cfg = RagConfig::new_default(DEFAULT_QDRANT_URL, "  ");
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
