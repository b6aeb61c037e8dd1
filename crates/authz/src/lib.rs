//! Token-scoped authorization for rolegate
//!
//! For every bearer token the proxy sees, this crate answers three questions
//! with one cached lookup:
//! - who the token belongs to (token authentication)
//! - which configured backend roles that identity may use (role evaluation)
//! - which projects or namespaces it can access (resource listing)
//!
//! [`RolesProjectsService`] is the entry point. [`evaluate_roles`] and
//! [`resolve`] are exposed for callers that need an uncached answer.

pub mod evaluator;
pub mod pipeline;
pub mod service;

pub use evaluator::{check_roles, evaluate_roles, PermissionOutcome, RoleDecision};
pub use pipeline::resolve;
pub use service::{RolesProjectsService, ServiceStats};

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;
