//! Loading engine configuration from JSON and the process environment

use rolegate_core::{
    constants::{
        DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_MS, ROLEGATE_CACHE_SIZE_VAR,
        ROLEGATE_CACHE_TTL_MS_VAR, ROLEGATE_SWEEP_INTERVAL_MS_VAR,
    },
    Error, PolicyTable, Result,
};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::config::EngineConfig;

/// On-disk shape of the configuration; every key is optional
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    cache_size: usize,
    cache_ttl_ms: u64,
    sweep_interval_ms: u64,
    backend_roles: PolicyTable,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            sweep_interval_ms: 0,
            backend_roles: PolicyTable::new(),
        }
    }
}

impl From<ConfigFile> for EngineConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            cache_size: file.cache_size,
            cache_ttl: Duration::from_millis(file.cache_ttl_ms),
            sweep_interval: Duration::from_millis(file.sweep_interval_ms),
            backend_roles: file.backend_roles,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;

        let config = EngineConfig::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read configuration", e))?;

        tracing::debug!("Loading engine configuration from {}", path.display());
        Self::from_json_str(&content)
    }

    /// Apply `ROLEGATE_*` environment overrides on top of this configuration
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Some(size) = env_value::<usize>(ROLEGATE_CACHE_SIZE_VAR)? {
            self.cache_size = size;
        }
        if let Some(ttl_ms) = env_value::<u64>(ROLEGATE_CACHE_TTL_MS_VAR)? {
            self.cache_ttl = Duration::from_millis(ttl_ms);
        }
        if let Some(interval_ms) = env_value::<u64>(ROLEGATE_SWEEP_INTERVAL_MS_VAR)? {
            self.sweep_interval = Duration::from_millis(interval_ms);
        }

        self.validate()?;
        Ok(self)
    }
}

fn env_value<T: FromStr>(variable: &str) -> Result<Option<T>> {
    match std::env::var(variable) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration(format!(
                "environment variable '{variable}' has invalid value '{raw}'"
            ))
        }),
        Err(_) => Ok(None),
    }
}
