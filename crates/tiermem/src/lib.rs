//! # Tiermem - Two-Tier Agent Memory
//!
//! A memory subsystem for conversational agents with two tiers:
//!
//! - **Short-term memory (STM)**: volatile, session-scoped key-value store
//!   with TTL expiry. Reads of expired entries come back empty; no sweep
//!   needed.
//! - **Long-term memory (LTM)**: durable text entries indexed for vector
//!   similarity search, behind injected embedding and vector-store
//!   capabilities.
//!
//! The [`MemoryManager`] orchestrates both: sessions whose combined text
//! scores above an importance threshold are promoted into a single long-term
//! entry, and [`MemoryManager::recall`] merges substring matches from the
//! session with similarity hits from the durable store.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiermem::{HashEmbeddingProvider, InMemoryVectorStore, MemoryConfig, MemoryManager};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MemoryConfig::new().with_vector_size(64);
//! let manager = MemoryManager::connect(
//!     &config,
//!     Arc::new(HashEmbeddingProvider::new(64)),
//!     Arc::new(InMemoryVectorStore::new()),
//! )
//! .await?;
//!
//! // Session-scoped short-term memory
//! manager.set_short_term("session-1", "task", "Urgent! Call Sarah ASAP");
//!
//! // Promote the session once it looks important enough
//! if let Some(id) = manager.promote_stm_to_ltm("session-1", "user-1", 0.3).await? {
//!     println!("promoted as {id}");
//! }
//!
//! // Unified recall across both tiers
//! let memories = manager.recall("user-1", "sarah", Some("session-1"), 5).await?;
//! for entry in memories {
//!     println!("[{:?}] {}", entry.source, entry.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! [`InMemoryVectorStore`] is the default backend for tests and demos. Enable
//! the `qdrant` feature for a Qdrant-backed store:
//!
//! ```toml
//! [dependencies]
//! tiermem = { version = "0.1", features = ["qdrant"] }
//! ```

pub mod config;
pub mod embedding;
pub mod entry;
pub mod error;
pub mod long_term;
pub mod manager;
pub mod scoring;
pub mod short_term;
pub mod vector;

pub use config::MemoryConfig;
pub use embedding::{Embedding, EmbeddingProvider, HashEmbeddingProvider};
pub use entry::{LongTermEntry, MemoryEntry, MemorySource, Metadata, ShortTermEntry};
pub use error::{MemoryError, MemoryResult};
pub use long_term::{LongTermMemory, LtmSearch};
pub use manager::{MemoryManager, DEFAULT_MIN_IMPORTANCE, DEFAULT_TOP_K};
pub use scoring::{ImportanceScorer, KeywordScorer};
pub use short_term::ShortTermMemory;
pub use vector::{InMemoryVectorStore, PointPayload, ScoredPoint, SearchResult, VectorPoint, VectorStore};

#[cfg(feature = "qdrant")]
pub use vector::QdrantVectorStore;
