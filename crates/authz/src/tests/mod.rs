//! Tests for role evaluation, resolution and the caching service


use rolegate_core::{BackendRoleSpec, PolicyTable};

/// A single always-evaluated role with an all-empty spec
fn key_policy() -> PolicyTable {
    PolicyTable::new().with_role("key", BackendRoleSpec::default())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
