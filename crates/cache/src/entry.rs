//! Cache entries and their expiry bookkeeping

use std::time::Duration;
use tokio::time::Instant;

/// A cached value with the absolute instant it stops being served
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// An entry is dead from its expiry instant onwards
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
