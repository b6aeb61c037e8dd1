//! Bounded TTL cache for rolegate
//!
//! An in-memory LRU cache with:
//! - A hard bound on the number of entries
//! - A fixed time-to-live per entry, set at insertion and never extended
//! - Lazy expiry on read, plus an optional background sweeper
//! - Hit/miss/eviction statistics

pub mod cleanup;
mod entry;
pub mod stats;
pub mod ttl_cache;

pub use cleanup::spawn_sweeper;
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use ttl_cache::BoundedTtlCache;

#[cfg(test)]
mod tests;
