//! Memory manager - orchestrates the two memory tiers
//!
//! The manager decides what lives where: short-term entries expire in place,
//! sessions worth keeping are promoted into long-term memory gated by an
//! importance score, and `recall` merges both tiers into one deduplicated
//! result set.

use crate::config::MemoryConfig;
use crate::embedding::EmbeddingProvider;
use crate::entry::{MemoryEntry, Metadata, METADATA_IMPORTANCE, SOURCE_STM_PROMOTION};
use crate::error::MemoryResult;
use crate::long_term::LongTermMemory;
use crate::scoring::{ImportanceScorer, KeywordScorer};
use crate::short_term::ShortTermMemory;
use crate::vector::VectorStore;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Default number of results returned by search and recall
pub const DEFAULT_TOP_K: usize = 5;

/// Default importance threshold for promotion
pub const DEFAULT_MIN_IMPORTANCE: f64 = 0.3;

/// Orchestrates short-term and long-term memory for a conversational agent
pub struct MemoryManager {
    stm: ShortTermMemory,
    ltm: LongTermMemory,
    scorer: Arc<dyn ImportanceScorer>,
}

impl MemoryManager {
    /// Create a manager from configuration and injected capabilities
    ///
    /// Async because long-term provisioning happens here; provisioning is
    /// idempotent, so reconnecting against an existing store is safe.
    pub async fn connect(
        config: &MemoryConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> MemoryResult<Self> {
        let ltm = LongTermMemory::connect(embedder, store, config.vector_size).await?;

        Ok(Self {
            stm: ShortTermMemory::new(config.stm_ttl_minutes),
            ltm,
            scorer: Arc::new(KeywordScorer::new()),
        })
    }

    /// Swap the importance scoring strategy
    pub fn with_scorer(mut self, scorer: Arc<dyn ImportanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    // ---- Short-term memory -------------------------------------------------

    /// Store a key-value pair in a session's short-term memory
    pub fn set_short_term(&self, session_id: &str, key: &str, value: &str) {
        self.stm.set(session_id, key, value);
    }

    /// Get a short-term value; `None` when missing or expired
    pub fn get_short_term(&self, session_id: &str, key: &str) -> Option<String> {
        self.stm.get(session_id, key)
    }

    /// All non-expired entries of a session, key-sorted
    pub fn get_all_short_term(&self, session_id: &str) -> BTreeMap<String, String> {
        self.stm.get_all(session_id)
    }

    /// Drop a session's short-term memory; idempotent
    pub fn clear_short_term(&self, session_id: &str) {
        self.stm.clear(session_id);
    }

    // ---- Long-term memory --------------------------------------------------

    /// Add an entry to long-term memory, scoring its importance when none is
    /// supplied
    pub async fn add_long_term(
        &self,
        user_id: &str,
        text: &str,
        mut metadata: Metadata,
        importance: Option<f64>,
    ) -> MemoryResult<String> {
        let importance = importance.unwrap_or_else(|| self.scorer.score(text));
        metadata.insert(
            METADATA_IMPORTANCE.to_string(),
            serde_json::json!(importance),
        );

        self.ltm.add(user_id, text, metadata).await
    }

    /// Search long-term memory, most similar first
    pub async fn search_long_term(
        &self,
        query: &str,
        user_id: Option<&str>,
        top_k: usize,
    ) -> MemoryResult<Vec<MemoryEntry>> {
        let results = self.ltm.search(query, user_id, top_k).await?;

        Ok(results
            .hits
            .into_iter()
            .map(|hit| MemoryEntry::from_long_term(hit.item))
            .collect())
    }

    // ---- Recall ------------------------------------------------------------

    /// Recall memories matching `query` from both tiers
    ///
    /// With a session, short-term entries whose value contains the query
    /// (case-insensitive substring) are collected first; when they alone
    /// satisfy `top_k` the vector backend is never consulted, since substring
    /// matching is far cheaper than a similarity search. Otherwise long-term
    /// results are appended, skipping any whose text exactly equals an
    /// already-included short-term match, and the merge is truncated to
    /// `top_k`.
    pub async fn recall(
        &self,
        user_id: &str,
        query: &str,
        session_id: Option<&str>,
        top_k: usize,
    ) -> MemoryResult<Vec<MemoryEntry>> {
        let mut entries: Vec<MemoryEntry> = Vec::new();

        if let Some(session) = session_id {
            let needle = query.to_lowercase();
            for (key, value) in self.stm.get_all(session) {
                if value.to_lowercase().contains(&needle) {
                    entries.push(MemoryEntry::from_short_term(user_id, &key, value));
                }
            }

            if entries.len() >= top_k {
                entries.truncate(top_k);
                return Ok(entries);
            }
        }

        let ltm_entries = self.search_long_term(query, Some(user_id), top_k).await?;

        let seen: HashSet<String> = entries.iter().map(|e| e.text.clone()).collect();
        entries.extend(ltm_entries.into_iter().filter(|e| !seen.contains(&e.text)));
        entries.truncate(top_k);

        Ok(entries)
    }

    // ---- Promotion ---------------------------------------------------------

    /// Promote a session's short-term memory into a single long-term entry
    ///
    /// The session snapshot is concatenated as `key: value` lines in
    /// key-sorted order and scored; below `min_importance` nothing happens and
    /// short-term memory is left untouched. At or above the threshold the
    /// combined text is persisted with promotion lineage in its metadata, the
    /// session is cleared, and the new id is returned.
    ///
    /// The snapshot is taken without holding any lock across the long-term
    /// write. Known race: a `set` on the same session landing between the
    /// long-term write and the clear is lost with the clear.
    pub async fn promote_stm_to_ltm(
        &self,
        session_id: &str,
        user_id: &str,
        min_importance: f64,
    ) -> MemoryResult<Option<String>> {
        let snapshot = self.stm.get_all(session_id);
        if snapshot.is_empty() {
            return Ok(None);
        }

        let combined = snapshot
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let score = self.scorer.score(&combined);
        if score < min_importance {
            tracing::debug!(session_id, score, min_importance, "promotion below threshold");
            return Ok(None);
        }

        let mut metadata = Metadata::new();
        metadata.insert(
            "source".to_string(),
            serde_json::json!(SOURCE_STM_PROMOTION),
        );
        metadata.insert(
            "keys".to_string(),
            serde_json::json!(snapshot.keys().collect::<Vec<_>>()),
        );

        let id = self
            .add_long_term(user_id, &combined, metadata, Some(score))
            .await?;

        self.stm.clear(session_id);
        tracing::info!(session_id, user_id, %id, score, "promoted session to long-term memory");

        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbeddingProvider;
    use crate::entry::MemorySource;
    use crate::vector::{InMemoryVectorStore, ScoredPoint, VectorPoint};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DIMS: usize = 64;

    /// Store double that counts backend calls
    struct CountingStore {
        inner: InMemoryVectorStore,
        searches: AtomicUsize,
        upserts: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryVectorStore::new(),
                searches: AtomicUsize::new(0),
                upserts: AtomicUsize::new(0),
            }
        }

        fn search_count(&self) -> usize {
            self.searches.load(Ordering::SeqCst)
        }

        fn upsert_count(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl VectorStore for CountingStore {
        async fn collection_exists(&self) -> MemoryResult<bool> {
            self.inner.collection_exists().await
        }

        async fn create_collection(&self, dimensions: usize) -> MemoryResult<()> {
            self.inner.create_collection(dimensions).await
        }

        async fn upsert(&self, point: VectorPoint) -> MemoryResult<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(point).await
        }

        async fn search(
            &self,
            vector: &[f32],
            limit: usize,
            user_id: Option<&str>,
        ) -> MemoryResult<Vec<ScoredPoint>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.inner.search(vector, limit, user_id).await
        }
    }

    async fn manager() -> (MemoryManager, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::new());
        let config = MemoryConfig::new().with_vector_size(DIMS);
        let manager = MemoryManager::connect(
            &config,
            Arc::new(HashEmbeddingProvider::new(DIMS)),
            store.clone(),
        )
        .await
        .unwrap();

        (manager, store)
    }

    #[tokio::test]
    async fn test_stm_passthrough() {
        let (manager, _) = manager().await;

        manager.set_short_term("s1", "task", "Test short term memory");
        assert_eq!(
            manager.get_short_term("s1", "task").as_deref(),
            Some("Test short term memory")
        );

        manager.clear_short_term("s1");
        assert_eq!(manager.get_short_term("s1", "task"), None);
    }

    #[tokio::test]
    async fn test_promote_empty_session_is_noop() {
        let (manager, store) = manager().await;

        let result = manager.promote_stm_to_ltm("empty", "u1", 0.0).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_promote_below_threshold_leaves_stm_intact() {
        let (manager, store) = manager().await;

        // "call" is the single keyword hit: 1/8 = 0.125 < 0.3
        manager.set_short_term("s1", "task", "Call Sarah at 4 PM");

        let result = manager
            .promote_stm_to_ltm("s1", "u1", DEFAULT_MIN_IMPORTANCE)
            .await
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(store.upsert_count(), 0);
        assert_eq!(
            manager.get_short_term("s1", "task").as_deref(),
            Some("Call Sarah at 4 PM")
        );
    }

    #[tokio::test]
    async fn test_promote_above_threshold_migrates_session() {
        let (manager, _) = manager().await;

        // urgent, call, asap, meeting, deadline: 5/8 = 0.625 >= 0.3
        manager.set_short_term(
            "s1",
            "task",
            "Urgent! Call Sarah ASAP, meeting at 4PM, deadline today",
        );

        let id = manager
            .promote_stm_to_ltm("s1", "u1", DEFAULT_MIN_IMPORTANCE)
            .await
            .unwrap()
            .expect("promotion should cross the threshold");
        assert!(!id.is_empty());

        // All-or-nothing: the session is gone once the entry is persisted
        assert!(manager.get_all_short_term("s1").is_empty());

        let results = manager
            .search_long_term("Urgent! Call Sarah", Some("u1"), 5)
            .await
            .unwrap();
        let promoted = results
            .iter()
            .find(|e| e.text.contains("Call Sarah ASAP"))
            .expect("promoted text should be searchable");

        assert!((promoted.importance - 0.625).abs() < 1e-9);
        assert_eq!(
            promoted.metadata.get("source").and_then(|v| v.as_str()),
            Some("stm_promotion")
        );
        assert_eq!(
            promoted.metadata.get("keys"),
            Some(&serde_json::json!(["task"]))
        );
    }

    #[tokio::test]
    async fn test_promotion_concatenates_in_key_order() {
        let (manager, _) = manager().await;

        manager.set_short_term("s1", "task", "call the client");
        manager.set_short_term("s1", "date", "2025-08-06");
        manager.set_short_term("s1", "intent", "urgent reminder");

        manager.promote_stm_to_ltm("s1", "u1", 0.0).await.unwrap().unwrap();

        let results = manager.search_long_term("reminder", Some("u1"), 1).await.unwrap();
        assert_eq!(
            results[0].text,
            "date: 2025-08-06\nintent: urgent reminder\ntask: call the client"
        );
    }

    #[tokio::test]
    async fn test_recall_short_circuits_on_stm_match() {
        let (manager, store) = manager().await;

        manager.set_short_term("s1", "task", "Call Sarah at 4 PM");

        let results = manager
            .recall("u1", "sarah", Some("s1"), 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, MemorySource::ShortTerm);
        assert_eq!(results[0].text, "Call Sarah at 4 PM");
        assert!(results[0].id.is_none());
        assert_eq!(results[0].importance, 0.5);

        // The vector backend was never consulted
        assert_eq!(store.search_count(), 0);
    }

    #[tokio::test]
    async fn test_recall_falls_back_to_ltm() {
        let (manager, store) = manager().await;

        manager
            .add_long_term("u1", "Quarterly review notes", Metadata::new(), None)
            .await
            .unwrap();

        let results = manager
            .recall("u1", "Quarterly review notes", None, 3)
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert_eq!(results[0].source, MemorySource::LongTerm);
        assert_eq!(results[0].text, "Quarterly review notes");
        assert_eq!(store.search_count(), 1);
    }

    #[tokio::test]
    async fn test_recall_merges_and_dedups_exact_text() {
        let (manager, _) = manager().await;

        let text = "Call Sarah at 4 PM";
        manager.set_short_term("s1", "task", text);
        manager
            .add_long_term("u1", text, Metadata::new(), None)
            .await
            .unwrap();
        manager
            .add_long_term("u1", "Sarah prefers afternoon calls", Metadata::new(), None)
            .await
            .unwrap();

        let results = manager.recall("u1", "sarah", Some("s1"), 5).await.unwrap();

        let duplicates = results.iter().filter(|e| e.text == text).count();
        assert_eq!(duplicates, 1);
        // The short-term copy wins; the long-term one is the dropped duplicate
        assert_eq!(
            results.iter().find(|e| e.text == text).unwrap().source,
            MemorySource::ShortTerm
        );
        assert!(results
            .iter()
            .any(|e| e.text == "Sarah prefers afternoon calls"));
    }

    #[tokio::test]
    async fn test_recall_truncates_to_top_k() {
        let (manager, _) = manager().await;

        for i in 0..4 {
            manager.set_short_term("s1", &format!("note-{i}"), &format!("meeting note {i}"));
        }

        let results = manager.recall("u1", "meeting", Some("s1"), 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_add_long_term_scores_when_unspecified() {
        let (manager, _) = manager().await;

        manager
            .add_long_term("u1", "urgent deadline alert", Metadata::new(), None)
            .await
            .unwrap();

        let results = manager
            .search_long_term("urgent deadline alert", Some("u1"), 1)
            .await
            .unwrap();

        // urgent, deadline, alert: 3/8
        assert!((results[0].importance - 0.375).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_custom_scorer_is_honored() {
        let store = Arc::new(CountingStore::new());
        let config = MemoryConfig::new().with_vector_size(DIMS);
        let manager = MemoryManager::connect(
            &config,
            Arc::new(HashEmbeddingProvider::new(DIMS)),
            store,
        )
        .await
        .unwrap()
        .with_scorer(Arc::new(crate::scoring::KeywordScorer::with_keywords(vec![
            "sarah".to_string(),
        ])));

        manager.set_short_term("s1", "task", "Sarah's birthday");

        let id = manager.promote_stm_to_ltm("s1", "u1", 0.9).await.unwrap();
        assert!(id.is_some());
    }
}
