//! Bounded, TTL-evicting in-process caches for idempotency keys and FX
//! quote locks.
//!
//! Process-local only: a single-instance deployment is the known
//! limitation this implies (see DESIGN.md). Eviction strategy mirrors the
//! teacher's `bounded_cache.rs` — oldest entry evicted on insert once the
//! cache is at capacity, entries past their TTL purged first.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

/// Generic bounded cache mapping a key to a value with max-size and TTL
/// eviction.
pub struct BoundedCache<K, V> {
    map: HashMap<K, (V, Instant)>,
    max_size: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(max_size: usize, ttl_secs: u64) -> Self {
        Self {
            map: HashMap::new(),
            max_size,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map
            .get(key)
            .filter(|(_, t)| t.elapsed() < self.ttl)
            .map(|(v, _)| v)
    }

    pub fn insert(&mut self, key: K, value: V) {
        let now = Instant::now();
        self.map.retain(|_, (_, t)| now.duration_since(*t) < self.ttl);
        while self.map.len() >= self.max_size && !self.map.is_empty() {
            let oldest = self
                .map
                .iter()
                .min_by_key(|(_, (_, t))| *t)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                self.map.remove(&k);
            } else {
                break;
            }
        }
        self.map.insert(key, (value, now));
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key).map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A locked FX rate, frozen for the lifetime of a quote so the composer
/// builds against a rate that can't move underneath it mid-chain.
#[derive(Debug, Clone, Copy)]
pub struct LockedQuote {
    pub from_amount: u64,
    pub to_amount: u64,
}

/// The two caches the service keeps in memory: idempotency keys (mapping a
/// tenant-scoped key to the transfer id it already produced) and FX quote
/// locks (mapping a quote id to its frozen rate).
pub struct ServiceCache {
    pub idempotency: BoundedCache<String, uuid::Uuid>,
    pub quotes: BoundedCache<uuid::Uuid, LockedQuote>,
}

impl ServiceCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            idempotency: BoundedCache::new(
                config.idempotency_cache_size,
                config.idempotency_ttl_secs,
            ),
            quotes: BoundedCache::new(config.quote_cache_size, config.quote_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut cache: BoundedCache<String, u32> = BoundedCache::new(10, 3600);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(2, 3600);
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);
        assert!(cache.get(&1).is_none());
        assert_eq!(cache.get(&3), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn remove_returns_value() {
        let mut cache: BoundedCache<u32, &str> = BoundedCache::new(10, 3600);
        cache.insert(1, "x");
        assert_eq!(cache.remove(&1), Some("x"));
        assert!(cache.get(&1).is_none());
    }
}
