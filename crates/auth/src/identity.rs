use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, RoleSet, TokenClaims};

/// Subject identifier taken verbatim from the `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Verified, request-scoped identity of the caller.
///
/// Only the verifier produces one, and only after the signature, audience and
/// expiry checks have all passed; fields are read-only outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub(crate) subject: SubjectId,
    pub(crate) email: Option<String>,
    pub(crate) role: Role,
    /// `None` only when the verifier is configured to accept tokens without `exp`.
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub(crate) fn from_claims(claims: TokenClaims, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
            expires_at,
        }
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn has_any_role(&self, allowed: &RoleSet) -> bool {
        allowed.contains(&self.role)
    }
}
