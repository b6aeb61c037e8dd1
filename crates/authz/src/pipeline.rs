//! Token resolution: authenticate, evaluate roles, list resources
//!
//! Authentication and resource listing are both required for a record to be
//! complete. Either failing aborts the resolution and produces no record,
//! even when role evaluation already finished. Role evaluation itself cannot
//! fail; an empty role set is a valid answer.

use rolegate_core::{AuthorizationRecord, Error, IdentityClient, PolicyTable, Result, TokenFingerprint};

use crate::evaluator::evaluate_roles;

/// Resolve everything the proxy needs to know about `token`
#[tracing::instrument(skip_all, fields(token = %TokenFingerprint::of(token)))]
pub async fn resolve<C>(
    client: &C,
    policy: &PolicyTable,
    token: &str,
) -> Result<AuthorizationRecord>
where
    C: IdentityClient + ?Sized,
{
    let identity = match client.authenticate_token(token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Token authentication failed: {e}");
            return Err(Error::authentication(TokenFingerprint::of(token), e));
        }
    };

    let roles = evaluate_roles(client, &identity, policy).await;

    let resources = match client.list_accessible_resources(token).await {
        Ok(resources) => resources,
        Err(e) => {
            tracing::warn!(
                user = %identity.username(),
                "Listing accessible resources failed: {e}"
            );
            return Err(Error::resource_listing(identity.username(), e));
        }
    };

    tracing::debug!(
        user = %identity.username(),
        roles = roles.len(),
        resources = resources.len(),
        "Resolved token"
    );

    Ok(AuthorizationRecord::new(identity, roles, resources))
}
