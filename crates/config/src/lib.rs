//! Configuration management for rolegate
//!
//! Handles building, loading and validating the engine configuration: cache
//! sizing and expiry, plus the backend role policy table.

pub mod config;
pub mod loader;

pub use config::{EngineConfig, EngineConfigBuilder};
