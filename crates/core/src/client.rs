use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ClientError;
use crate::types::{Identity, PermissionCheck, Resource};

/// Capability for talking to the cluster identity service.
///
/// Implementations own transport concerns such as retries, timeouts and TLS;
/// the engine calls each operation once and interprets the outcome.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Review a bearer token and return the principal it belongs to
    async fn authenticate_token(&self, token: &str) -> Result<Identity, ClientError>;

    /// Ask whether the principal may perform the check's verb on its resource
    async fn check_permission(&self, check: &PermissionCheck) -> Result<bool, ClientError>;

    /// List the tenant-scoped resources visible to the token's principal
    async fn list_accessible_resources(&self, token: &str) -> Result<Vec<Resource>, ClientError>;
}

#[async_trait]
impl<C: IdentityClient + ?Sized> IdentityClient for Arc<C> {
    async fn authenticate_token(&self, token: &str) -> Result<Identity, ClientError> {
        (**self).authenticate_token(token).await
    }

    async fn check_permission(&self, check: &PermissionCheck) -> Result<bool, ClientError> {
        (**self).check_permission(check).await
    }

    async fn list_accessible_resources(&self, token: &str) -> Result<Vec<Resource>, ClientError> {
        (**self).list_accessible_resources(token).await
    }
}
