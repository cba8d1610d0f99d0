//! Thin adapter around `qdrant-client` implementing [`VectorIndex`].
//!
//! Keeps every builder call in one place so the rest of the workspace only
//! sees `RetrievalMatch` and plain JSON metadata.

use std::collections::HashMap;

use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder, point_id::PointIdOptions,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::index::{IndexFuture, RetrievalMatch, VectorIndex};

/// Deterministic UUIDv5 from an arbitrary string id.
///
/// Qdrant only accepts unsigned integers or UUIDs as point ids, so chunk ids
/// such as `report.txt#1000` are mapped through this function.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

fn point_uuid(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap_or_else(|_| stable_uuid(id))
}

/// Qdrant-backed vector index for a single collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    space: VectorSpace,
    exact: bool,
}

impl std::fmt::Debug for QdrantFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantFacade")
            .field("collection", &self.collection)
            .field("space", &self.space)
            .finish()
    }
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` for invalid config and `RagError::Qdrant`
    /// if the client cannot be built.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            space: cfg.space.clone(),
            exact: cfg.exact_search,
        })
    }

    /// Creates the collection if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        if self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?
        {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        warn!(
            collection = %self.collection,
            size = self.space.size,
            distance = ?self.space.distance,
            "collection not found, creating"
        );

        let distance = match self.space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.space.size as u64, distance)),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(collection = %self.collection, "collection created");
        Ok(())
    }

    fn check_dim(&self, vector: &[f32]) -> Result<(), RagError> {
        if vector.len() != self.space.size {
            return Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want: self.space.size,
            });
        }
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %self.collection, top_k, include_metadata))]
    async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>, RagError> {
        self.check_dim(&vector)?;

        let mut builder = SearchPointsBuilder::new(&self.collection, vector, top_k)
            .with_payload(include_metadata);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<RetrievalMatch> = res
            .result
            .into_iter()
            .map(|sp| RetrievalMatch {
                id: point_id_string(sp.id),
                score: sp.score,
                metadata: if include_metadata {
                    payload_to_json(sp.payload)
                } else {
                    serde_json::Value::Null
                },
            })
            .collect();

        debug!(hits = out.len(), "search completed");
        Ok(out)
    }

    #[instrument(skip_all, fields(collection = %self.collection, id))]
    async fn upsert_one(
        &self,
        id: &str,
        vector: Vec<f32>,
        metadata: serde_json::Value,
    ) -> Result<(), RagError> {
        self.check_dim(&vector)?;
        if !metadata.is_object() {
            return Err(RagError::MetadataNotObject);
        }
        let payload: Payload = metadata
            .try_into()
            .map_err(|e| RagError::Qdrant(format!("payload convert: {e}")))?;

        let point = PointStruct::new(point_uuid(id).to_string(), vector, payload);
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        debug!("point upserted");
        Ok(())
    }
}

impl VectorIndex for QdrantFacade {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> IndexFuture<'a, Vec<RetrievalMatch>> {
        Box::pin(self.search(vector, top_k, include_metadata))
    }

    fn upsert<'a>(
        &'a self,
        id: &'a str,
        vector: Vec<f32>,
        metadata: serde_json::Value,
    ) -> IndexFuture<'a, ()> {
        Box::pin(self.upsert_one(id, vector, metadata))
    }

    fn prepare<'a>(&'a self) -> IndexFuture<'a, ()> {
        Box::pin(self.ensure_collection())
    }
}

fn point_id_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
    match id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Uuid(s)) => s,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Converts a Qdrant payload into a JSON object, keeping nested values.
fn payload_to_json(payload: HashMap<String, QValue>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = payload
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect();
    serde_json::Value::Object(map)
}
