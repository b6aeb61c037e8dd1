//! Engine configuration
//!
//! `EngineConfig` is the single source of truth for how the authorization
//! cache is sized and which backend roles are evaluated. It is immutable once
//! built and cheap to share.

use rolegate_core::{
    constants::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_MS},
    BackendRoleSpec, Error, PolicyTable, Result,
};
use std::time::Duration;

/// Sizing, expiry and policy for one authorization engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of cached tokens
    pub cache_size: usize,

    /// How long a resolved token stays cached
    pub cache_ttl: Duration,

    /// Period of the background expiry sweep; zero disables it
    pub sweep_interval: Duration,

    /// Backend roles evaluated for every token
    pub backend_roles: PolicyTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            sweep_interval: Duration::ZERO,
            backend_roles: PolicyTable::new(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Check the configuration can back a working engine
    pub fn validate(&self) -> Result<()> {
        if self.cache_size == 0 {
            return Err(Error::configuration("cache_size must be greater than zero"));
        }
        if self.cache_ttl.is_zero() {
            return Err(Error::configuration("cache_ttl must be greater than zero"));
        }

        // Entries with empty fields are legal and get checked like any other
        if self
            .backend_roles
            .iter()
            .any(|(name, _)| name.trim().is_empty())
        {
            return Err(Error::configuration("backend role names must not be empty"));
        }

        Ok(())
    }
}

/// Builder for programmatic construction of an [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_size(mut self, size: usize) -> Self {
        self.config.cache_size = size;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    pub fn backend_role(mut self, name: impl Into<String>, spec: BackendRoleSpec) -> Self {
        self.config.backend_roles.insert(name, spec);
        self
    }

    pub fn backend_roles(mut self, roles: PolicyTable) -> Self {
        self.config.backend_roles = roles;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
