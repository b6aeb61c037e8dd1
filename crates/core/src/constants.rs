/// Constants used throughout the rolegate codebase
// Cache defaults
pub const DEFAULT_CACHE_SIZE: usize = 120;
pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;

// Environment variable names
pub const ROLEGATE_CACHE_SIZE_VAR: &str = "ROLEGATE_CACHE_SIZE";
pub const ROLEGATE_CACHE_TTL_MS_VAR: &str = "ROLEGATE_CACHE_TTL_MS";
pub const ROLEGATE_SWEEP_INTERVAL_MS_VAR: &str = "ROLEGATE_SWEEP_INTERVAL_MS";

// Number of hex characters kept from a token digest for log output
pub const TOKEN_FINGERPRINT_LEN: usize = 12;
