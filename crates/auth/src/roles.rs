use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the token's `role` claim.
///
/// Roles are opaque strings at this layer. A token without a role claim is
/// treated as holding [`Role::AUTHENTICATED`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Baseline role of any signed-in user.
    pub const AUTHENTICATED: Role = Role(Cow::Borrowed("authenticated"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const MODERATOR: Role = Role(Cow::Borrowed("moderator"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::AUTHENTICATED
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable set of roles allowed to perform one protected operation.
///
/// Bound once when routes are wired, never per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// `{admin}`
    pub fn admin() -> Self {
        Self::new([Role::ADMIN])
    }

    /// `{admin, moderator}`
    pub fn moderator() -> Self {
        Self::new([Role::ADMIN, Role::MODERATOR])
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Role::new(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::new(value)
    }
}

impl core::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for role in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(role.as_str())?;
            first = false;
        }
        Ok(())
    }
}
