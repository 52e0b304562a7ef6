//! Qdrant-backed vector store
//!
//! Talks to a Qdrant instance over gRPC. Points carry the full
//! [`PointPayload`] as their payload; the `user_id` filter is applied natively
//! with a payload match condition.

use super::{PointPayload, ScoredPoint, VectorPoint, VectorStore};
use crate::error::{MemoryError, MemoryResult};
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

/// Vector store backed by a Qdrant collection
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    /// Connect to a Qdrant instance at `url` (gRPC endpoint), bound to the
    /// given collection
    pub fn connect(url: &str, collection: impl Into<String>) -> MemoryResult<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| MemoryError::backend("connect", e))?;

        Ok(Self {
            client,
            collection: collection.into(),
        })
    }
}

#[async_trait::async_trait]
impl VectorStore for QdrantVectorStore {
    async fn collection_exists(&self) -> MemoryResult<bool> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| MemoryError::backend("collection_exists", e))
    }

    async fn create_collection(&self, dimensions: usize) -> MemoryResult<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| MemoryError::backend("create_collection", e))?;

        tracing::info!(collection = %self.collection, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, point: VectorPoint) -> MemoryResult<()> {
        let payload_json = serde_json::to_value(&point.payload)?;
        let payload = Payload::try_from(payload_json)
            .map_err(|e| MemoryError::backend("upsert", e))?;

        let point = PointStruct::new(point.id, point.vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| MemoryError::backend("upsert", e))?;

        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        user_id: Option<&str>,
    ) -> MemoryResult<Vec<ScoredPoint>> {
        let mut request =
            SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit as u64)
                .with_payload(true);

        if let Some(user) = user_id {
            request = request.filter(Filter::must([Condition::matches(
                "user_id",
                user.to_string(),
            )]));
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| MemoryError::backend("search", e))?;

        response
            .result
            .into_iter()
            .map(|hit| {
                let id = match hit.id.and_then(|id| id.point_id_options) {
                    Some(PointIdOptions::Uuid(uuid)) => uuid,
                    Some(PointIdOptions::Num(num)) => num.to_string(),
                    None => String::new(),
                };

                let fields: serde_json::Map<String, serde_json::Value> = hit
                    .payload
                    .into_iter()
                    .map(|(key, value)| (key, value_to_json(value)))
                    .collect();
                let payload: PointPayload =
                    serde_json::from_value(serde_json::Value::Object(fields))?;

                Ok(ScoredPoint {
                    id,
                    score: hit.score,
                    payload,
                    vector: None,
                })
            })
            .collect()
    }
}

/// Convert a Qdrant payload value into plain JSON
fn value_to_json(value: QdrantValue) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::json!(i),
        Some(Kind::DoubleValue(d)) => serde_json::json!(d),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(fields)) => serde_json::Value::Object(
            fields
                .fields
                .into_iter()
                .map(|(key, value)| (key, value_to_json(value)))
                .collect(),
        ),
    }
}
