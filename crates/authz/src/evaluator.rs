//! Backend role evaluation
//!
//! Every entry of the policy table becomes one permission check against the
//! identity service. A check that cannot be answered is recorded as
//! [`PermissionOutcome::Indeterminate`] and never fails the evaluation; it only
//! withholds that one role.

use futures::future::join_all;
use rolegate_core::{ClientError, Identity, IdentityClient, PermissionCheck, PolicyTable, RoleSet};

/// Answer to a single backend role's permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionOutcome {
    Permitted,
    Denied,
    /// The check itself failed; treated as denied
    Indeterminate(ClientError),
}

impl PermissionOutcome {
    pub fn from_response(response: Result<bool, ClientError>) -> Self {
        match response {
            Ok(true) => PermissionOutcome::Permitted,
            Ok(false) => PermissionOutcome::Denied,
            Err(e) => PermissionOutcome::Indeterminate(e),
        }
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, PermissionOutcome::Permitted)
    }
}

/// Outcome of checking one named backend role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDecision {
    pub role: String,
    pub outcome: PermissionOutcome,
}

/// Run the permission check of every backend role for `identity`.
///
/// Checks are issued concurrently; the returned decisions follow the policy
/// table's order.
pub async fn check_roles<C>(
    client: &C,
    identity: &Identity,
    policy: &PolicyTable,
) -> Vec<RoleDecision>
where
    C: IdentityClient + ?Sized,
{
    let checks = policy.iter().map(|(role, spec)| async move {
        let check = PermissionCheck::for_role(identity, spec);
        let outcome = PermissionOutcome::from_response(client.check_permission(&check).await);
        RoleDecision {
            role: role.clone(),
            outcome,
        }
    });

    join_all(checks).await
}

/// Determine which backend roles `identity` may exercise
pub async fn evaluate_roles<C>(client: &C, identity: &Identity, policy: &PolicyTable) -> RoleSet
where
    C: IdentityClient + ?Sized,
{
    let mut roles = RoleSet::new();

    for decision in check_roles(client, identity, policy).await {
        match decision.outcome {
            PermissionOutcome::Permitted => {
                tracing::trace!(role = %decision.role, "Backend role permitted");
                roles.insert(decision.role);
            }
            PermissionOutcome::Denied => {
                tracing::trace!(role = %decision.role, "Backend role denied");
            }
            PermissionOutcome::Indeterminate(e) => {
                tracing::warn!(
                    role = %decision.role,
                    user = %identity.username(),
                    "Unable to evaluate backend role, treating it as denied: {e}"
                );
            }
        }
    }

    roles
}
