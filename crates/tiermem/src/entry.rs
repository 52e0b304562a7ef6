//! Entry types for both memory tiers
//!
//! `ShortTermEntry` and `LongTermEntry` are the stored shapes; `MemoryEntry`
//! is the unified read-only projection produced by recall and never persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form, string-keyed metadata carried by long-term entries
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key holding the importance score once an entry has been scored
pub const METADATA_IMPORTANCE: &str = "importance";

/// Metadata value marking entries created by STM promotion
pub const SOURCE_STM_PROMOTION: &str = "stm_promotion";

/// Importance assigned when an entry carries no score of its own
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// A single short-term memory entry, keyed by `(session_id, key)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermEntry {
    /// Session this entry belongs to
    pub session_id: String,

    /// Entry key, unique within the session
    pub key: String,

    /// Stored value
    pub value: String,

    /// When the entry was written (expiry is measured from this)
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ShortTermEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        session_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            key: key.into(),
            value: value.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// A durable long-term memory entry
///
/// The `id` is minted by the long-term adapter when the entry is persisted
/// and is immutable thereafter; callers never supply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTermEntry {
    /// Globally unique identifier (uuid v4), adapter-assigned
    pub id: String,

    /// Owner of the entry
    pub user_id: String,

    /// The remembered text
    pub text: String,

    /// Open-schema metadata; carries `importance` once scored
    #[serde(default)]
    pub metadata: Metadata,

    /// Embedding of `text`, when the caller asked for it to be returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// When the entry was persisted
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LongTermEntry {
    /// Importance recorded in metadata, or the default when absent
    pub fn importance(&self) -> f64 {
        self.metadata
            .get(METADATA_IMPORTANCE)
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_IMPORTANCE)
    }
}

/// Which tier a recall result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// In-process, TTL-bounded session store
    ShortTerm,
    /// Durable vector-indexed store
    LongTerm,
}

/// Unified recall result spanning both tiers
///
/// A read-only projection assembled by the manager; short-term results have no
/// id and a fixed importance of 0.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Long-term id; absent for short-term results
    pub id: Option<String>,

    /// Owner, when known
    pub user_id: Option<String>,

    /// The remembered text
    pub text: String,

    /// Metadata carried over from the source tier
    #[serde(default)]
    pub metadata: Metadata,

    /// When the memory was created (short-term) or persisted (long-term)
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Tier the result came from
    pub source: MemorySource,

    /// Importance score in [0, 1]
    pub importance: f64,
}

impl MemoryEntry {
    /// Wrap a short-term value as a recall result
    pub fn from_short_term(user_id: impl Into<String>, key: &str, value: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("key".to_string(), serde_json::Value::String(key.to_string()));

        Self {
            id: None,
            user_id: Some(user_id.into()),
            text: value.into(),
            metadata,
            timestamp: chrono::Utc::now(),
            source: MemorySource::ShortTerm,
            importance: DEFAULT_IMPORTANCE,
        }
    }

    /// Project a long-term entry into a recall result
    pub fn from_long_term(entry: LongTermEntry) -> Self {
        let importance = entry.importance();
        Self {
            id: Some(entry.id),
            user_id: Some(entry.user_id),
            text: entry.text,
            metadata: entry.metadata,
            timestamp: entry.created_at,
            source: MemorySource::LongTerm,
            importance,
        }
    }
}
