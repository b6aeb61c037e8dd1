//! Background sweeping of expired entries

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::ttl_cache::BoundedTtlCache;

/// Start a task that periodically purges expired entries.
///
/// Sweeping only removes entries `get` would already report as missing, so it
/// reclaims memory without changing what callers observe. Returns `None` when
/// the interval is zero or no tokio runtime is running.
pub fn spawn_sweeper<K, V>(
    cache: &Arc<BoundedTtlCache<K, V>>,
    interval: Duration,
) -> Option<JoinHandle<()>>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // Zero disables sweeping (useful for tests)
    if interval.is_zero() {
        return None;
    }

    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            tracing::warn!(
                "No tokio runtime available, expired entries will only be dropped on read"
            );
            return None;
        }
    };

    // Hold a weak reference so the sweeper never keeps a dropped cache alive
    let weak = Arc::downgrade(cache);
    let handle = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(cache) = weak.upgrade() else {
                break;
            };
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Swept expired cache entries");
            }
        }
    });

    Some(handle)
}
