//! Vector similarity backend abstraction
//!
//! The vector store is an external collaborator behind a narrow trait:
//! idempotent collection provisioning, point upsert, and similarity search
//! with an optional owner filter. The similarity metric is fixed at cosine.
//!
//! Two backends ship with the crate: [`InMemoryVectorStore`] (default, used by
//! tests and demos) and, behind the `qdrant` feature, [`QdrantVectorStore`].

mod memory;
#[cfg(feature = "qdrant")]
mod qdrant;

pub use memory::InMemoryVectorStore;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;

use crate::entry::Metadata;
use crate::error::MemoryResult;
use serde::{Deserialize, Serialize};

/// Payload persisted alongside a vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    /// Owner of the point
    pub user_id: String,

    /// The indexed text
    pub text: String,

    /// Open-schema metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// When the point was written
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A vector point to be upserted
#[derive(Debug, Clone)]
pub struct VectorPoint {
    /// Unique point id (uuid string)
    pub id: String,

    /// Embedding vector
    pub vector: Vec<f32>,

    /// Payload stored with the vector
    pub payload: PointPayload,
}

/// A ranked search hit returned by a backend
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    /// Point id
    pub id: String,

    /// Similarity score (cosine; higher is more similar)
    pub score: f32,

    /// Stored payload
    pub payload: PointPayload,

    /// Stored vector, when the backend returns it
    pub vector: Option<Vec<f32>>,
}

/// A generic scored search result
///
/// Used by the long-term adapter to pair entries with their similarity score.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// The item that was found
    pub item: T,

    /// Similarity score (higher is more similar)
    pub score: f32,
}

impl<T> SearchResult<T> {
    /// Create a new search result
    pub fn new(item: T, score: f32) -> Self {
        Self { item, score }
    }
}

/// Trait for vector similarity backends
///
/// A store instance is bound to a single named collection; the metric is
/// cosine similarity.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Whether the store's collection has been provisioned
    async fn collection_exists(&self) -> MemoryResult<bool>;

    /// Create the collection with the given dimensionality and cosine metric
    ///
    /// Callers check [`collection_exists`](Self::collection_exists) first;
    /// together the pair makes provisioning idempotent.
    async fn create_collection(&self, dimensions: usize) -> MemoryResult<()>;

    /// Insert or replace a point by id
    async fn upsert(&self, point: VectorPoint) -> MemoryResult<()>;

    /// Similarity search, ranked by descending score
    ///
    /// `user_id` constrains results to one owner. Backends that cannot apply
    /// the filter natively must return `supports_user_filter() == false` and
    /// ignore the argument; the long-term adapter then filters client-side.
    async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        user_id: Option<&str>,
    ) -> MemoryResult<Vec<ScoredPoint>>;

    /// Whether the backend applies the `user_id` filter natively
    fn supports_user_filter(&self) -> bool {
        true
    }
}
