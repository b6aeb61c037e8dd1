//! Tests for the bounded TTL cache

use super::*;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const LONG_TTL: Duration = Duration::from_secs(3600);

#[test]
fn test_rejects_zero_capacity_and_ttl() {
    assert!(BoundedTtlCache::<String, u32>::new(0, LONG_TTL).is_err());
    assert!(BoundedTtlCache::<String, u32>::new(10, Duration::ZERO).is_err());
    assert!(BoundedTtlCache::<String, u32>::new(10, LONG_TTL).is_ok());
}

#[test]
fn test_get_and_put() {
    let cache = BoundedTtlCache::new(4, LONG_TTL).unwrap();

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.put("a".to_string(), 1), None);
    assert_eq!(cache.get("a"), Some(1));

    // Replacing a key is not an eviction
    assert_eq!(cache.put("a".to_string(), 2), None);
    assert_eq!(cache.get("a"), Some(2));
    assert_eq!(cache.len(), 1);

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.insertions, 2);
    assert_eq!(stats.evictions, 0);
}

#[test]
fn test_lru_eviction() {
    let cache = BoundedTtlCache::new(3, LONG_TTL).unwrap();

    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);
    cache.put("c".to_string(), 3);

    // Over capacity, 'a' is the least recently used
    assert_eq!(cache.put("d".to_string(), 4), Some("a".to_string()));
    assert_eq!(cache.get("a"), None);

    // Access 'b' to make it more recent
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.put("e".to_string(), 5), Some("c".to_string()));

    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("d"), Some(4));
    assert_eq!(cache.get("e"), Some(5));
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions, 2);
}

#[test]
fn test_remove_and_clear() {
    let cache = BoundedTtlCache::new(3, LONG_TTL).unwrap();
    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);

    assert_eq!(cache.remove("a"), Some(1));
    assert_eq!(cache.remove("a"), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().invalidations, 1);

    cache.put("c".to_string(), 3);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 3);

    let stats = cache.stats();
    assert_eq!(stats.invalidations, 3);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.expirations, 0);
}

#[tokio::test(start_paused = true)]
async fn test_expiration() {
    let cache = BoundedTtlCache::new(3, Duration::from_millis(50)).unwrap();
    cache.put("expires".to_string(), "soon");

    tokio::time::advance(Duration::from_millis(49)).await;
    assert_eq!(cache.get("expires"), Some("soon"));

    // Expiry is inclusive of the deadline
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get("expires"), None);
    assert!(cache.is_empty());

    let stats = cache.stats();
    assert_eq!(stats.expirations, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test(start_paused = true)]
async fn test_get_does_not_extend_ttl() {
    let cache = BoundedTtlCache::new(3, Duration::from_millis(50)).unwrap();
    cache.put("key".to_string(), 1);

    for _ in 0..4 {
        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(cache.get("key"), Some(1));
    }

    tokio::time::advance(Duration::from_millis(10)).await;
    assert_eq!(cache.get("key"), None);
}

#[tokio::test(start_paused = true)]
async fn test_put_resets_expiry() {
    let cache = BoundedTtlCache::new(3, Duration::from_millis(50)).unwrap();
    cache.put("key".to_string(), 1);

    tokio::time::advance(Duration::from_millis(40)).await;
    cache.put("key".to_string(), 2);

    tokio::time::advance(Duration::from_millis(40)).await;
    assert_eq!(cache.get("key"), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired() {
    let cache = BoundedTtlCache::new(4, Duration::from_millis(50)).unwrap();
    cache.put("old-1".to_string(), 1);
    cache.put("old-2".to_string(), 2);

    tokio::time::advance(Duration::from_millis(30)).await;
    cache.put("new".to_string(), 3);

    tokio::time::advance(Duration::from_millis(20)).await;
    assert_eq!(cache.purge_expired(), 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("new"), Some(3));
    assert_eq!(cache.stats().expirations, 2);
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_purges_in_background() {
    let cache = Arc::new(BoundedTtlCache::new(4, Duration::from_millis(50)).unwrap());
    let handle = spawn_sweeper(&cache, Duration::from_millis(20)).unwrap();

    cache.put("key".to_string(), 1);
    assert_eq!(cache.len(), 1);

    tokio::time::sleep(Duration::from_millis(70)).await;
    assert_eq!(cache.len(), 0);

    handle.abort();
}

#[test]
fn test_sweeper_needs_runtime_and_interval() {
    let cache = Arc::new(BoundedTtlCache::<String, u32>::new(4, LONG_TTL).unwrap());
    assert!(spawn_sweeper(&cache, Duration::from_millis(20)).is_none());
}

#[tokio::test]
async fn test_sweeper_disabled_with_zero_interval() {
    let cache = Arc::new(BoundedTtlCache::<String, u32>::new(4, LONG_TTL).unwrap());
    assert!(spawn_sweeper(&cache, Duration::ZERO).is_none());
}

#[test]
fn test_concurrent_access() {
    let cache = Arc::new(BoundedTtlCache::new(16, LONG_TTL).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("key-{}", (t * 200 + i) % 32);
                    if cache.get(&key).is_none() {
                        cache.put(key, i);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 16);
}

proptest! {
    /// The cache never holds more than its capacity, and with no reads in
    /// between, the most recent `capacity` distinct keys are the survivors.
    #[test]
    fn prop_capacity_bound_keeps_most_recent(
        capacity in 1usize..8,
        keys in prop::collection::vec(0u8..16, 0..64),
    ) {
        let cache = BoundedTtlCache::new(capacity, LONG_TTL).unwrap();
        for key in &keys {
            cache.put(*key, u32::from(*key));
            prop_assert!(cache.len() <= capacity);
        }

        let mut recent = Vec::new();
        for key in keys.iter().rev() {
            if !recent.contains(key) {
                recent.push(*key);
            }
        }
        recent.truncate(capacity);

        prop_assert_eq!(cache.len(), recent.len());
        for key in recent {
            prop_assert_eq!(cache.get(&key), Some(u32::from(key)));
        }
    }
}
