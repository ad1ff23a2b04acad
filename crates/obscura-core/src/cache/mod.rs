//! The proxy's front cache.
//!
//! A bounded LRU serves a hot subset of logical keys locally so that
//! only cache misses (and LRU evictions) generate backend traffic.

mod lru;

pub use lru::{CacheStats, LruCache};
