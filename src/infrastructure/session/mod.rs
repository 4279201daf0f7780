use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Per-session submission state, keyed by the client's session identifier.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Unix-seconds timestamp of the last recorded submission, if any.
    async fn last_submission(&self, session_id: &str) -> Option<i64>;

    /// Record a submission. The stored timestamp never moves backwards.
    async fn record_submission(&self, session_id: &str, timestamp: i64);
}

#[derive(Debug)]
struct SessionEntry {
    last_submission: i64,
    last_seen: Instant,
}

/// In-memory store backed by a concurrent map with one lock per session,
/// so a read-then-write from one request is not interleaved with another
/// request for the same session.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    map: Arc<DashMap<String, Arc<Mutex<SessionEntry>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop sessions with no activity for longer than `ttl`.
    /// Returns how many entries were removed.
    pub fn purge_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let keys_to_remove: Vec<String> = self
            .map
            .iter()
            .filter_map(|entry| {
                let e = entry.value().lock();
                if now.duration_since(e.last_seen) > ttl {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect();

        let count = keys_to_remove.len();
        for key in keys_to_remove {
            self.map.remove(&key);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn last_submission(&self, session_id: &str) -> Option<i64> {
        self.map.get(session_id).map(|entry| {
            let mut e = entry.lock();
            e.last_seen = Instant::now();
            e.last_submission
        })
    }

    async fn record_submission(&self, session_id: &str, timestamp: i64) {
        match self.map.entry(session_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                let mut e = entry.get().lock();
                e.last_submission = e.last_submission.max(timestamp);
                e.last_seen = Instant::now();
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(SessionEntry {
                    last_submission: timestamp,
                    last_seen: Instant::now(),
                })));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_has_no_timestamp() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.last_submission("nope").await, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn records_and_reads_back() {
        let store = InMemorySessionStore::new();
        store.record_submission("abc", 1_700_000_000).await;
        assert_eq!(store.last_submission("abc").await, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn timestamp_never_moves_backwards() {
        let store = InMemorySessionStore::new();
        store.record_submission("abc", 1_700_000_100).await;
        store.record_submission("abc", 1_700_000_050).await;
        assert_eq!(store.last_submission("abc").await, Some(1_700_000_100));
    }

    #[tokio::test]
    async fn purge_removes_only_idle_entries() {
        let store = InMemorySessionStore::new();
        store.record_submission("fresh", 1).await;
        assert_eq!(store.purge_idle(Duration::from_secs(60)), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_idle(Duration::ZERO), 1);
        assert!(store.is_empty());
    }
}
