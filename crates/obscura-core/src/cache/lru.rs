//! LRU front cache.
//!
//! Thread-safe LRU cache with O(1) amortized operations using
//! `IndexMap`: the map's insertion order doubles as the recency order
//! (front = LRU, back = MRU), so promoting an entry is a
//! `shift_remove` + `insert`.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = self.hits as f64 / total as f64;
            rate
        }
    }
}

/// Bounded, strictly-ordered LRU cache.
///
/// Invariants: at most `capacity` entries; exactly one recency
/// position per entry; `get` promotes to most-recent; `put` on an
/// existing key updates the value and promotes; overflow evicts the
/// least-recent entry.
pub struct LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    capacity: usize,
    inner: RwLock<IndexMap<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a new LRU cache with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(IndexMap::with_capacity(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the cache's configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the cache currently holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Looks up `key`, promoting it to most-recent on a hit.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.write();
        match inner.shift_remove(key) {
            Some(value) => {
                inner.insert(key.clone(), value.clone());
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Inserts or updates `key`, promoting it to most-recent.
    ///
    /// If the cache now holds more than `capacity` entries, the
    /// least-recent entry is evicted and its value is dropped. Callers
    /// that need the evicted entry (as the planner's Phase 6 does) call
    /// [`Self::evict`] explicitly instead of relying on this eviction.
    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.write();
        inner.shift_remove(&key);
        inner.insert(key, value);

        if inner.len() > self.capacity && inner.shift_remove_index(0).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Non-mutating presence test.
    #[must_use]
    pub fn has(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Unconditionally removes and returns the least-recent entry.
    ///
    /// Returns `None` when the cache is empty. This is the explicit
    /// eviction the planner drives in Phase 6 when a real key's fresh
    /// value must displace something to stay within capacity.
    pub fn evict(&self) -> Option<(K, V)> {
        let mut inner = self.inner.write();
        let evicted = inner.shift_remove_index(0);
        if evicted.is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        evicted
    }

    /// Returns a snapshot of the cache's hit/miss/eviction counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
