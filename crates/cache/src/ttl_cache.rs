//! Capacity-bounded LRU cache with a fixed per-entry time-to-live

use lru::LruCache;
use parking_lot::Mutex;
use rolegate_core::{Error, Result};
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

use crate::entry::CacheEntry;
use crate::stats::{CacheStats, CacheStatsSnapshot};

/// Thread-safe cache holding at most `capacity` entries for at most `ttl` each.
///
/// Expiry is lazy: `get` drops an entry whose TTL has run out and reports a
/// miss. Reads never extend the TTL, but a hit does count as use for LRU
/// eviction. The internal lock is held only for the map operation itself.
pub struct BoundedTtlCache<K, V> {
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
    ttl: Duration,
    stats: CacheStats,
}

impl<K, V> BoundedTtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::configuration("cache capacity must be greater than zero"))?;
        if ttl.is_zero() {
            return Err(Error::configuration("cache TTL must be greater than zero"));
        }

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            stats: CacheStats::default(),
        })
    }

    /// Look up a live entry, promoting it to most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let live = match entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if !entry.is_expired_at(now) => Some(entry.value().clone()),
            Some(_) => None,
        };

        match live {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                entries.pop(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert a value with a fresh expiry.
    ///
    /// Returns the key of the least-recently-used entry if the capacity bound
    /// forced one out. Replacing an existing key is not an eviction.
    pub fn put(&self, key: K, value: V) -> Option<K> {
        let entry = CacheEntry::new(value, self.ttl);
        let mut entries = self.entries.lock();
        self.stats.record_insertion();

        match entries.push(key.clone(), entry) {
            Some((displaced, _)) if displaced != key => {
                self.stats.record_eviction();
                tracing::trace!("Evicted least recently used cache entry");
                Some(displaced)
            }
            _ => None,
        }
    }

    /// Drop one entry, live or expired, counting it as an invalidation
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.entries.lock().pop(key)?;
        self.stats.record_invalidations(1);
        Some(removed.value().clone())
    }

    /// Drop every entry whose TTL has run out, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }

        self.stats.record_expirations(expired.len() as u64);
        expired.len()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        self.stats.record_invalidations(entries.len() as u64);
        entries.clear();
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for BoundedTtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("BoundedTtlCache")
            .field("capacity", &entries.cap())
            .field("entry_count", &entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
