//! Short-term memory: session-scoped key-value store with TTL expiry
//!
//! Entries live in process memory, keyed by `(session_id, key)`, and read as
//! absent once older than the store's TTL. Expiry is evaluated lazily at read
//! time; no background sweep is required for correctness.
//!
//! Sessions are sharded across a concurrent map, so writers to one session
//! never contend with writers to another, and `get_all` clones the session map
//! under the shard guard for a consistent snapshot.

use crate::entry::ShortTermEntry;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};

/// In-process, TTL-bounded, per-session key-value store
///
/// All operations are infallible: absence (missing or expired) is a normal
/// return value, not an error.
pub struct ShortTermMemory {
    sessions: DashMap<String, HashMap<String, ShortTermEntry>>,
    ttl: Duration,
}

impl ShortTermMemory {
    /// Create a store with the given TTL in minutes
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_ttl(Duration::minutes(ttl_minutes))
    }

    /// Create a store with an explicit TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Insert or overwrite the entry for `(session_id, key)`, stamping the
    /// current time. Last write wins.
    pub fn set(&self, session_id: &str, key: &str, value: &str) {
        let entry = ShortTermEntry::new(session_id, key, value);

        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), entry);

        tracing::debug!(session_id, key, "stored short-term entry");
    }

    /// Get the value for `(session_id, key)` if present and not expired
    pub fn get(&self, session_id: &str, key: &str) -> Option<String> {
        let session = self.sessions.get(session_id)?;
        let entry = session.get(key)?;

        if self.is_expired(entry) {
            return None;
        }

        Some(entry.value.clone())
    }

    /// All non-expired entries for a session, keyed and sorted by entry key
    ///
    /// The key-sorted order is what promotion and recall iterate in, so the
    /// concatenated promotion text is deterministic.
    pub fn get_all(&self, session_id: &str) -> BTreeMap<String, String> {
        let Some(session) = self.sessions.get(session_id) else {
            return BTreeMap::new();
        };

        session
            .values()
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Remove all entries for a session; clearing an unknown session is a no-op
    pub fn clear(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            tracing::debug!(session_id, "cleared short-term session");
        }
    }

    /// Number of live sessions (expired entries may still be counted until read)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn is_expired(&self, entry: &ShortTermEntry) -> bool {
        Utc::now() - entry.created_at > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let stm = ShortTermMemory::new(30);
        stm.set("s1", "task", "Call Sarah at 4 PM");

        assert_eq!(stm.get("s1", "task").as_deref(), Some("Call Sarah at 4 PM"));
        assert_eq!(stm.get("s1", "missing"), None);
        assert_eq!(stm.get("other", "task"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let stm = ShortTermMemory::new(30);
        stm.set("s1", "task", "first");
        stm.set("s1", "task", "second");

        assert_eq!(stm.get("s1", "task").as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let stm = ShortTermMemory::new(30);
        stm.set("s1", "task", "to be cleared");

        stm.clear("s1");
        assert_eq!(stm.get("s1", "task"), None);

        // Clearing again, and clearing an unknown session, are no-ops
        stm.clear("s1");
        stm.clear("never-existed");
    }

    #[test]
    fn test_get_all_sorted_by_key() {
        let stm = ShortTermMemory::new(30);
        stm.set("s1", "task", "add_task");
        stm.set("s1", "date", "2025-08-06");
        stm.set("s1", "intent", "reminder");

        let all = stm.get_all("s1");
        let keys: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["date", "intent", "task"]);

        assert!(stm.get_all("unknown").is_empty());
    }

    #[tokio::test]
    async fn test_expired_entries_read_as_absent() {
        let stm = ShortTermMemory::with_ttl(Duration::milliseconds(30));
        stm.set("s1", "task", "short lived");

        assert_eq!(stm.get("s1", "task").as_deref(), Some("short lived"));

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;

        assert_eq!(stm.get("s1", "task"), None);
        assert!(stm.get_all("s1").is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_refreshes_expiry() {
        let stm = ShortTermMemory::with_ttl(Duration::milliseconds(300));
        stm.set("s1", "task", "v1");

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        stm.set("s1", "task", "v2");

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        // 400ms after the first write, but only 200ms after the overwrite
        assert_eq!(stm.get("s1", "task").as_deref(), Some("v2"));
    }

    #[test]
    fn test_session_isolation() {
        let stm = ShortTermMemory::new(30);
        stm.set("s1", "data", "session one");
        stm.set("s2", "data", "session two");

        stm.clear("s1");

        assert_eq!(stm.get("s1", "data"), None);
        assert_eq!(stm.get("s2", "data").as_deref(), Some("session two"));
    }

    #[test]
    fn test_concurrent_writers() {
        use std::sync::Arc;

        let stm = Arc::new(ShortTermMemory::new(30));
        let mut handles = Vec::new();

        for i in 0..8 {
            let stm = stm.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..50 {
                    stm.set(&format!("session-{}", i % 2), &format!("key-{j}"), "value");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stm.get_all("session-0").len(), 50);
        assert_eq!(stm.get_all("session-1").len(), 50);
    }
}
