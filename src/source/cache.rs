use crate::models::RawTable;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Time-boxed memoization of fetch results, keyed by the full request URL.
///
/// Entries expire purely by age — there is no data-change detection. Callers
/// hitting the same URL inside the window all observe the same table; this is
/// a performance optimization, not a correctness guarantee.
pub struct FetchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    table: RawTable,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached table if it is still inside the TTL window.
    /// Expired entries are dropped on access.
    pub fn get(&self, key: &str) -> Option<RawTable> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.table.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, table: RawTable) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                table,
            },
        );
    }
}
