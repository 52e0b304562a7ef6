//! Long-term memory adapter
//!
//! Wraps the embedding capability and the vector store behind the two
//! operations the manager needs: `add` and `search`. The backing store and the
//! embedding model are injected; this adapter owns id assignment, collection
//! provisioning, and the owner-filter discipline.

use crate::embedding::EmbeddingProvider;
use crate::entry::{LongTermEntry, Metadata};
use crate::error::{MemoryError, MemoryResult};
use crate::vector::{PointPayload, ScoredPoint, SearchResult, VectorPoint, VectorStore};
use std::sync::Arc;
use uuid::Uuid;

/// Over-fetch multiplier used when the backend cannot filter by owner and the
/// adapter must post-filter client-side
const FILTER_OVERFETCH: usize = 4;

/// Outcome of a long-term search
#[derive(Debug)]
pub struct LtmSearch {
    /// Hits ordered by descending similarity
    pub hits: Vec<SearchResult<LongTermEntry>>,

    /// True when client-side owner filtering may have hidden matches beyond
    /// the over-fetch window; distinguishes "fewer than requested" from
    /// "no more matches exist"
    pub filter_degraded: bool,
}

/// Durable, vector-indexed memory of text entries
pub struct LongTermMemory {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    vector_size: usize,
}

impl LongTermMemory {
    /// Connect the adapter, provisioning the collection if needed
    ///
    /// Provisioning is idempotent: an existing collection is left untouched,
    /// so reconnecting against a populated store neither fails nor duplicates
    /// data.
    pub async fn connect(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        vector_size: usize,
    ) -> MemoryResult<Self> {
        if !store.collection_exists().await? {
            store.create_collection(vector_size).await?;
            tracing::info!(vector_size, "created long-term memory collection");
        }

        Ok(Self {
            embedder,
            store,
            vector_size,
        })
    }

    /// Embed `text`, mint a fresh id, and persist the entry
    ///
    /// The id is returned only once the write has succeeded; there are no
    /// partial writes visible to the caller.
    pub async fn add(&self, user_id: &str, text: &str, metadata: Metadata) -> MemoryResult<String> {
        let embedding = self.embedder.embed(text).await?;
        if embedding.dimensions != self.vector_size {
            return Err(MemoryError::dimensions(self.vector_size, embedding.dimensions));
        }

        let id = Uuid::new_v4().to_string();
        let point = VectorPoint {
            id: id.clone(),
            vector: embedding.vector,
            payload: PointPayload {
                user_id: user_id.to_string(),
                text: text.to_string(),
                metadata,
                timestamp: chrono::Utc::now(),
            },
        };

        self.store.upsert(point).await?;
        tracing::info!(%id, user_id, "added long-term entry");

        Ok(id)
    }

    /// Similarity search for `query`, optionally scoped to one owner
    ///
    /// Results are ordered by descending similarity, at most `top_k` of them.
    /// When the backend cannot apply the owner filter natively the adapter
    /// over-fetches and filters client-side; it never returns unfiltered
    /// results. An empty `query` degrades to "most similar to the empty
    /// embedding", which is backend-defined and not guaranteed to be
    /// meaningful.
    pub async fn search(
        &self,
        query: &str,
        user_id: Option<&str>,
        top_k: usize,
    ) -> MemoryResult<LtmSearch> {
        let embedding = self.embedder.embed(query).await?;

        let native = user_id.is_none() || self.store.supports_user_filter();
        if native {
            let points = self.store.search(&embedding.vector, top_k, user_id).await?;
            return Ok(LtmSearch {
                hits: points.into_iter().map(to_scored_entry).collect(),
                filter_degraded: false,
            });
        }

        // Backend ignores the owner filter: over-fetch, then post-filter.
        // This degrades the effective top_k when the owner's entries are
        // sparse within the fetch window.
        let user = user_id.unwrap_or_default();
        let fetch = top_k.saturating_mul(FILTER_OVERFETCH).max(top_k);
        let points = self.store.search(&embedding.vector, fetch, None).await?;
        let fetched = points.len();

        let mut hits: Vec<SearchResult<LongTermEntry>> = points
            .into_iter()
            .filter(|point| point.payload.user_id == user)
            .map(to_scored_entry)
            .collect();

        // The window was full and still short of top_k: matches may exist
        // beyond it, which is not the same as "no matches".
        let filter_degraded = hits.len() < top_k && fetched == fetch;
        hits.truncate(top_k);

        if filter_degraded {
            tracing::warn!(
                user_id = user,
                top_k,
                fetch_window = fetch,
                returned = hits.len(),
                "client-side owner filter degraded search results"
            );
        }

        Ok(LtmSearch {
            hits,
            filter_degraded,
        })
    }
}

fn to_scored_entry(point: ScoredPoint) -> SearchResult<LongTermEntry> {
    SearchResult::new(
        LongTermEntry {
            id: point.id,
            user_id: point.payload.user_id,
            text: point.payload.text,
            metadata: point.payload.metadata,
            embedding: point.vector,
            created_at: point.payload.timestamp,
        },
        point.score,
    )
}
