//! Per-query result cache (spec §4.11): keyed by lowercased query, 5-minute default
//! TTL, last-writer-wins. Independent of the IDF cache (`index::idf::IdfCache`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<T> {
    inserted_at: Instant,
    value: T,
}

pub struct QueryCache<T: Clone> {
    entries: DashMap<String, CacheEntry<T>>,
    ttl: Duration,
    hits: AtomicU64,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl, hits: AtomicU64::new(0) }
    }

    /// Returns the cached value for `query` if present and not yet expired, bumping the
    /// hit counter on a match.
    pub fn get(&self, query: &str) -> Option<T> {
        let key = query.to_lowercase();
        let entry = self.entries.get(&key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.value.clone())
    }

    /// Inserts or overwrites the cached value for `query` (last-writer-wins).
    pub fn put(&self, query: &str, value: T) {
        let key = query.to_lowercase();
        self.entries.insert(key, CacheEntry { inserted_at: Instant::now(), value });
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_query_is_case_insensitive() {
        let cache = QueryCache::new(Duration::from_secs(300));
        cache.put("Rust Programming", vec![1, 2, 3]);
        assert_eq!(cache.get("rust programming"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn miss_returns_none() {
        let cache: QueryCache<Vec<i32>> = QueryCache::new(Duration::from_secs(300));
        assert_eq!(cache.get("nothing cached"), None);
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let cache = QueryCache::new(Duration::from_millis(1));
        cache.put("rust", vec![1]);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("rust"), None);
    }

    #[test]
    fn hit_counter_increments_on_match() {
        let cache = QueryCache::new(Duration::from_secs(300));
        cache.put("rust", vec![1]);
        cache.get("rust");
        cache.get("rust");
        assert_eq!(cache.hits(), 2);
    }
}
