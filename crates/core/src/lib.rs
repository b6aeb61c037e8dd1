//! Core domain types, errors, and constants for `rolegate`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias, plus `ClientError`, the
//!   failure surface of the identity service.
//! - **`types`**: the authorization data model: `Identity`, `BackendRoleSpec`,
//!   `PolicyTable`, `RoleSet`, `Resource` and the cached `AuthorizationRecord`.
//! - **`client`**: the `IdentityClient` capability the engine is built around.
//! - **`constants`**: shared defaults and environment variable names.

pub mod client;
pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    client::IdentityClient,
    constants::*,
    errors::{ClientError, Error, Result},
    types::*,
};
