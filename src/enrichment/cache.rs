//! Time-bounded cache of match detail records
//!
//! Entries are replaced whole on refetch and evicted lazily: an expired entry
//! is removed by the lookup that finds it. Concurrent writers for the same id
//! are last-writer-wins; both hold a snapshot of the same upstream record.

use crate::analytics::types::MatchDetail;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Unix milliseconds at insert
    pub fetched_at_ms: i64,
    pub detail: Arc<MatchDetail>,
}

pub struct DetailCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_ms: i64,
    /// Timestamp function in Unix milliseconds (for testing with mock time)
    now_fn: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl DetailCache {
    /// Create a cache using system time
    pub fn new(ttl: Duration) -> Self {
        Self::new_with_timestamp_fn(ttl, Box::new(|| chrono::Utc::now().timestamp_millis()))
    }

    /// Create a cache with a custom clock
    ///
    /// # Arguments
    /// * `ttl` - Freshness window; an entry exactly `ttl` old is still fresh
    /// * `now_fn` - Function returning Unix milliseconds
    pub fn new_with_timestamp_fn(ttl: Duration, now_fn: Box<dyn Fn() -> i64 + Send + Sync>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            now_fn,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are replaced atomically, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fresh entry for `match_id`, evicting it if expired
    pub fn get(&self, match_id: &str) -> Option<Arc<MatchDetail>> {
        let now = (self.now_fn)();
        let mut entries = self.lock();

        let expired = match entries.get(match_id) {
            None => return None,
            Some(entry) => now.saturating_sub(entry.fetched_at_ms) > self.ttl_ms,
        };
        if expired {
            entries.remove(match_id);
            return None;
        }
        entries.get(match_id).map(|e| Arc::clone(&e.detail))
    }

    /// Store a freshly fetched record, replacing any previous entry
    pub fn insert(&self, match_id: &str, detail: MatchDetail) -> Arc<MatchDetail> {
        let detail = Arc::new(detail);
        let entry = CacheEntry {
            fetched_at_ms: (self.now_fn)(),
            detail: Arc::clone(&detail),
        };
        self.lock().insert(match_id.to_string(), entry);
        detail
    }

    pub fn invalidate(&self, match_id: &str) -> bool {
        self.lock().remove(match_id).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included until looked up
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms.max(0) as u64)
    }
}
