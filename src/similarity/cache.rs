//! Bounded memoization cache for similarity scores.
//!
//! Scoring the same `(a, b)` pair repeats constantly inside the matcher and
//! booster loops, so composite scores are memoized. The cache is explicitly
//! owned by its [`SimilarityEngine`](crate::similarity::SimilarityEngine) —
//! no process-wide state — and keyed by an FNV-1a content hash of both raw
//! input strings, keeping keys stable across processes and platforms.
//!
//! The bound is a batch-evicting cap, not a strict LRU: once the cache
//! exceeds `max_entries`, the oldest `evict_batch` insertions are dropped.

use std::collections::{HashMap, VecDeque};

// ---------------------------------------------------------------------------
// Content hashing
// ---------------------------------------------------------------------------

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a 64-bit hash of a byte sequence.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Cache key for an ordered string pair.
pub(crate) fn pair_key(a: &str, b: &str) -> (u64, u64) {
    (fnv1a(a.as_bytes()), fnv1a(b.as_bytes()))
}

// ---------------------------------------------------------------------------
// SimilarityCache
// ---------------------------------------------------------------------------

/// Insertion-ordered, batch-evicting score cache.
#[derive(Debug)]
pub struct SimilarityCache {
    scores: HashMap<(u64, u64), f64>,
    order: VecDeque<(u64, u64)>,
    max_entries: usize,
    evict_batch: usize,
}

impl SimilarityCache {
    /// Create a cache holding at most `max_entries` scores, dropping the
    /// oldest `evict_batch` insertions when the cap is exceeded.
    pub fn new(max_entries: usize, evict_batch: usize) -> Self {
        Self {
            scores: HashMap::with_capacity(max_entries.min(1024)),
            order: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
            evict_batch: evict_batch.max(1),
        }
    }

    /// Look up a previously inserted score.
    pub fn get(&self, key: (u64, u64)) -> Option<f64> {
        self.scores.get(&key).copied()
    }

    /// Insert a score, evicting the oldest batch when over capacity.
    /// Re-inserting an existing key overwrites the value without growing
    /// the insertion order.
    pub fn insert(&mut self, key: (u64, u64), score: f64) {
        if self.scores.insert(key, score).is_none() {
            self.order.push_back(key);
        }
        if self.scores.len() > self.max_entries {
            for _ in 0..self.evict_batch {
                match self.order.pop_front() {
                    Some(old) => {
                        self.scores.remove(&old);
                    }
                    None => break,
                }
            }
        }
    }

    /// Number of cached scores.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_round_trips() {
        let mut cache = SimilarityCache::new(10, 2);
        let key = pair_key("tôi đi làm", "Tôi đi làm.");
        cache.insert(key, 0.8618);
        assert_eq!(cache.get(key), Some(0.8618));
    }

    #[test]
    fn keys_are_order_sensitive() {
        assert_ne!(pair_key("a", "b"), pair_key("b", "a"));
    }

    #[test]
    fn keys_are_content_based_and_deterministic() {
        assert_eq!(pair_key("xin chào", "bạn"), pair_key("xin chào", "bạn"));
        assert_ne!(pair_key("xin chào", "bạn"), pair_key("xin chao", "bạn"));
    }

    #[test]
    fn eviction_drops_oldest_batch() {
        let mut cache = SimilarityCache::new(4, 2);
        let keys: Vec<_> = (0..5).map(|i| pair_key(&format!("a{i}"), "b")).collect();
        for (i, &k) in keys.iter().enumerate() {
            cache.insert(k, i as f64 / 10.0);
        }
        // 5th insert overflows the cap of 4 → the two oldest go.
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(keys[0]), None);
        assert_eq!(cache.get(keys[1]), None);
        assert!(cache.get(keys[4]).is_some());
    }

    #[test]
    fn reinsert_overwrites_without_duplicating_order() {
        let mut cache = SimilarityCache::new(10, 2);
        let key = pair_key("a", "b");
        cache.insert(key, 0.1);
        cache.insert(key, 0.2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(key), Some(0.2));
    }

    #[test]
    fn stays_within_bounds_under_load() {
        let mut cache = SimilarityCache::new(100, 20);
        for i in 0..1000 {
            cache.insert(pair_key(&format!("q{i}"), &format!("c{i}")), 0.5);
        }
        assert!(cache.len() <= 100, "len = {}", cache.len());
    }
}
