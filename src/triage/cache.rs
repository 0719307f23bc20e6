//! Bounded memoization of classifications.
//!
//! Keyed by the exact query string. The cache is an LRU with a configured
//! capacity so a long-running server cannot grow without limit.

use crate::types::Classification;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Default number of memoized queries.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Thread-safe LRU cache of query → classification.
pub struct ClassificationCache {
    entries: Mutex<LruCache<String, Classification>>,
}

impl ClassificationCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a memoized classification, marking the entry recently used.
    pub fn get(&self, query: &str) -> Option<Classification> {
        self.entries.lock().get(query).copied()
    }

    /// Memoize a classification.
    pub fn insert(&self, query: &str, classification: Classification) {
        self.entries.lock().put(query.to_string(), classification);
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ClassificationCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CAPACITY).expect("non-zero default capacity"))
    }
}
