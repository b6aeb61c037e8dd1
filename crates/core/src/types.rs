use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::TOKEN_FINGERPRINT_LEN;

/// Short, non-reversible identifier for a bearer token.
///
/// Raw tokens are credentials and must never be written to logs or error
/// messages; the fingerprint stands in for them wherever a token needs to be
/// correlated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    #[must_use]
    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(TOKEN_FINGERPRINT_LEN);
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated principal extracted from a token review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    username: String,
    groups: Vec<String>,
}

impl Identity {
    /// Groups are kept in the order the identity service returned them
    #[must_use]
    pub fn new(username: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            username: username.into(),
            groups,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// A named backend role: one permission check against the control plane.
///
/// An empty `resource_api_group` selects the core API group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendRoleSpec {
    pub namespace: String,
    pub verb: String,
    pub resource: String,
    pub resource_api_group: String,
}

impl BackendRoleSpec {
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        verb: impl Into<String>,
        resource: impl Into<String>,
        resource_api_group: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            verb: verb.into(),
            resource: resource.into(),
            resource_api_group: resource_api_group.into(),
        }
    }
}

/// Role name to policy entry mapping, read-only once the engine is built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTable(BTreeMap<String, BackendRoleSpec>);

impl PolicyTable {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a role, returning the previous spec registered under the name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        spec: BackendRoleSpec,
    ) -> Option<BackendRoleSpec> {
        self.0.insert(name.into(), spec)
    }

    #[must_use]
    pub fn with_role(mut self, name: impl Into<String>, spec: BackendRoleSpec) -> Self {
        self.insert(name, spec);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BackendRoleSpec> {
        self.0.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BackendRoleSpec> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, BackendRoleSpec)> for PolicyTable {
    fn from_iter<I: IntoIterator<Item = (String, BackendRoleSpec)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PolicyTable {
    type Item = (&'a String, &'a BackendRoleSpec);
    type IntoIter = btree_map::Iter<'a, String, BackendRoleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Names of the backend roles an identity may currently exercise
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        self.0.insert(role.into())
    }

    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A tenant-scoped resource (project or namespace) visible to an identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
}

impl Resource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Everything the proxy needs to authorize requests carrying one token.
///
/// Records are immutable; a refresh replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRecord {
    identity: Identity,
    roles: RoleSet,
    resources: Vec<Resource>,
}

impl AuthorizationRecord {
    #[must_use]
    pub fn new(identity: Identity, roles: RoleSet, resources: Vec<Resource>) -> Self {
        Self {
            identity,
            roles,
            resources,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }
}

/// Arguments of a single point-in-time permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheck {
    pub username: String,
    pub groups: Vec<String>,
    pub namespace: String,
    pub verb: String,
    pub resource: String,
    pub resource_api_group: String,
}

impl PermissionCheck {
    /// Build the check a backend role asks of the given identity
    #[must_use]
    pub fn for_role(identity: &Identity, spec: &BackendRoleSpec) -> Self {
        Self {
            username: identity.username().to_string(),
            groups: identity.groups().to_vec(),
            namespace: spec.namespace.clone(),
            verb: spec.verb.clone(),
            resource: spec.resource.clone(),
            resource_api_group: spec.resource_api_group.clone(),
        }
    }
}
