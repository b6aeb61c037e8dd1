//! Cache-fronted roles and projects service
//!
//! The entry point the proxy calls for every request. Resolved records are
//! cached per raw token for a fixed TTL; failed resolutions are never cached.
//! Concurrent misses for the same token are funnelled through a per-token gate
//! so only one resolution reaches the identity service at a time, while
//! different tokens resolve in parallel.

use dashmap::DashMap;
use rolegate_cache::{spawn_sweeper, BoundedTtlCache, CacheStatsSnapshot};
use rolegate_config::EngineConfig;
use rolegate_core::{AuthorizationRecord, IdentityClient, PolicyTable, Result, TokenFingerprint};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::pipeline::resolve;

type RecordCache = BoundedTtlCache<String, Arc<AuthorizationRecord>>;

/// Counters describing how the service has been answering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub cache: CacheStatsSnapshot,
    /// Resolutions started against the identity service
    pub resolutions: u64,
    /// Resolutions that ended in an error
    pub failed_resolutions: u64,
    /// Callers served by a resolution another caller performed
    pub coalesced: u64,
}

#[derive(Debug, Default)]
struct ServiceCounters {
    resolutions: AtomicU64,
    failed_resolutions: AtomicU64,
    coalesced: AtomicU64,
}

/// Memoizes [`AuthorizationRecord`]s per bearer token
pub struct RolesProjectsService<C: IdentityClient> {
    client: C,
    policy: Arc<PolicyTable>,
    cache: Arc<RecordCache>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    counters: ServiceCounters,
    sweeper: Option<JoinHandle<()>>,
}

impl<C: IdentityClient> RolesProjectsService<C> {
    pub fn new(capacity: usize, ttl: Duration, policy: PolicyTable, client: C) -> Result<Self> {
        Ok(Self {
            client,
            policy: Arc::new(policy),
            cache: Arc::new(BoundedTtlCache::new(capacity, ttl)?),
            in_flight: DashMap::new(),
            counters: ServiceCounters::default(),
            sweeper: None,
        })
    }

    /// Build a service from validated configuration, starting the expiry
    /// sweeper when one is configured
    pub fn from_config(config: &EngineConfig, client: C) -> Result<Self> {
        config.validate()?;

        let mut service = Self::new(
            config.cache_size,
            config.cache_ttl,
            config.backend_roles.clone(),
            client,
        )?;
        service.sweeper = spawn_sweeper(&service.cache, config.sweep_interval);

        tracing::debug!(
            cache_size = config.cache_size,
            cache_ttl_ms = config.cache_ttl.as_millis() as u64,
            backend_roles = config.backend_roles.len(),
            sweeping = service.sweeper.is_some(),
            "Created roles and projects service"
        );

        Ok(service)
    }

    /// Return the authorization record for `token`, resolving it on a miss.
    ///
    /// Any error means the caller must deny the request. Errors are not
    /// cached: the next call for the same token resolves from scratch.
    pub async fn get_roles_and_projects(&self, token: &str) -> Result<Arc<AuthorizationRecord>> {
        let fingerprint = TokenFingerprint::of(token);

        if let Some(record) = self.cache.get(token) {
            tracing::debug!(token = %fingerprint, "Authorization cache hit");
            return Ok(record);
        }

        let flight = InFlight::join(&self.in_flight, token);
        let _turn = flight.gate().lock().await;

        // Someone ahead of us in the gate may have resolved this token already
        if let Some(record) = self.cache.get(token) {
            self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(token = %fingerprint, "Served by a concurrent resolution");
            return Ok(record);
        }

        tracing::debug!(token = %fingerprint, "Authorization cache miss, resolving token");
        self.counters.resolutions.fetch_add(1, Ordering::Relaxed);

        match resolve(&self.client, &self.policy, token).await {
            Ok(record) => {
                let record = Arc::new(record);
                if self.cache.put(token.to_string(), Arc::clone(&record)).is_some() {
                    tracing::debug!("Authorization cache full, evicted least recently used token");
                }
                Ok(record)
            }
            Err(e) => {
                self.counters
                    .failed_resolutions
                    .fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Forget the cached record for `token`, if any
    pub fn invalidate(&self, token: &str) -> bool {
        self.cache.remove(token).is_some()
    }

    /// Forget every cached record
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            cache: self.cache.stats(),
            resolutions: self.counters.resolutions.load(Ordering::Relaxed),
            failed_resolutions: self.counters.failed_resolutions.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
        }
    }

    /// Number of tokens with a resolution gate currently allocated
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl<C: IdentityClient> Drop for RolesProjectsService<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

impl<C: IdentityClient> std::fmt::Debug for RolesProjectsService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolesProjectsService")
            .field("cache", &self.cache)
            .field("backend_roles", &self.policy.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

/// Membership in a token's resolution gate.
///
/// The gate is shared by every caller currently interested in the token and
/// is removed from the map by the last one to leave, including callers whose
/// future was dropped mid-resolution.
struct InFlight<'a> {
    gates: &'a DashMap<String, Arc<Mutex<()>>>,
    token: &'a str,
    gate: Option<Arc<Mutex<()>>>,
}

impl<'a> InFlight<'a> {
    fn join(gates: &'a DashMap<String, Arc<Mutex<()>>>, token: &'a str) -> Self {
        // Cloned under the shard lock, so a gate in the map with a strong
        // count of one has no members left
        let gate = gates
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        Self {
            gates,
            token,
            gate: Some(gate),
        }
    }

    fn gate(&self) -> &Mutex<()> {
        match &self.gate {
            Some(gate) => gate,
            None => unreachable!("gate is only released on drop"),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Our reference must be gone before the count is checked
        drop(self.gate.take());
        self.gates
            .remove_if(self.token, |_, gate| Arc::strong_count(gate) == 1);
    }
}
