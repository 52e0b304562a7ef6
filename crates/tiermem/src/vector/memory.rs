//! In-memory vector store with linear cosine scan
//!
//! The default backend for tests, demos, and single-process deployments.
//! For durable storage use the qdrant backend.

use super::{ScoredPoint, VectorPoint, VectorStore};
use crate::embedding::cosine_similarity;
use crate::error::{MemoryError, MemoryResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

struct Collection {
    dimensions: usize,
    points: HashMap<String, VectorPoint>,
}

/// In-memory vector store bound to a single collection
pub struct InMemoryVectorStore {
    collection: RwLock<Option<Collection>>,
}

impl InMemoryVectorStore {
    /// Create an empty, unprovisioned store
    pub fn new() -> Self {
        Self {
            collection: RwLock::new(None),
        }
    }

    /// Number of stored points
    pub async fn count(&self) -> usize {
        match self.collection.read().await.as_ref() {
            Some(collection) => collection.points.len(),
            None => 0,
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn collection_exists(&self) -> MemoryResult<bool> {
        Ok(self.collection.read().await.is_some())
    }

    async fn create_collection(&self, dimensions: usize) -> MemoryResult<()> {
        let mut guard = self.collection.write().await;
        if guard.is_none() {
            *guard = Some(Collection {
                dimensions,
                points: HashMap::new(),
            });
        }
        Ok(())
    }

    async fn upsert(&self, point: VectorPoint) -> MemoryResult<()> {
        let mut guard = self.collection.write().await;
        let collection = guard
            .as_mut()
            .ok_or_else(|| MemoryError::backend("upsert", "collection not provisioned"))?;

        if point.vector.len() != collection.dimensions {
            return Err(MemoryError::dimensions(
                collection.dimensions,
                point.vector.len(),
            ));
        }

        collection.points.insert(point.id.clone(), point);
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        user_id: Option<&str>,
    ) -> MemoryResult<Vec<ScoredPoint>> {
        let guard = self.collection.read().await;
        let collection = guard
            .as_ref()
            .ok_or_else(|| MemoryError::backend("search", "collection not provisioned"))?;

        let mut scored: Vec<ScoredPoint> = collection
            .points
            .values()
            .filter(|point| user_id.map_or(true, |user| point.payload.user_id == user))
            .map(|point| ScoredPoint {
                id: point.id.clone(),
                score: cosine_similarity(vector, &point.vector),
                payload: point.payload.clone(),
                vector: Some(point.vector.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);

        Ok(scored)
    }
}
