//! # Two-Tier Memory Demo
//!
//! Walks through the full memory lifecycle:
//!
//! 1. Populate a session's short-term memory
//! 2. Promote the session into long-term memory (importance-gated)
//! 3. Search long-term memory semantically
//! 4. Unified recall across both tiers
//!
//! ## Run This Example
//!
//! ```bash
//! cargo run --example memory_demo
//! ```

use std::sync::Arc;
use tiermem::{HashEmbeddingProvider, InMemoryVectorStore, MemoryConfig, MemoryManager};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = MemoryConfig::new().with_vector_size(128);
    let manager = MemoryManager::connect(
        &config,
        Arc::new(HashEmbeddingProvider::new(128)),
        Arc::new(InMemoryVectorStore::new()),
    )
    .await?;

    let session_id = "session_abc";
    let user_id = "user_123";

    // Step 1: simulate short-term usage
    manager.set_short_term(session_id, "intent", "add_task");
    manager.set_short_term(session_id, "task", "Urgent! Call Sarah ASAP about the deadline");
    manager.set_short_term(session_id, "date", "2025-08-06");

    info!("short-term memory: {:?}", manager.get_all_short_term(session_id));

    // Step 2: promote the session into long-term memory
    match manager.promote_stm_to_ltm(session_id, user_id, 0.3).await? {
        Some(id) => info!("promoted to long-term memory with id {id}"),
        None => info!("session scored below the promotion threshold"),
    }

    // Step 3: semantic search over long-term memory
    let results = manager
        .search_long_term("What tasks do I have with Sarah?", Some(user_id), 5)
        .await?;

    info!("long-term search results:");
    for entry in &results {
        info!("- [{}] {}", entry.timestamp, entry.text);
    }

    // Step 4: unified recall (session is empty after promotion, so this
    // falls through to the long-term tier)
    let memories = manager
        .recall(user_id, "deadline", Some(session_id), 5)
        .await?;

    info!("recall results:");
    for entry in &memories {
        info!("- [{:?}, importance {:.3}] {}", entry.source, entry.importance, entry.text);
    }

    Ok(())
}
