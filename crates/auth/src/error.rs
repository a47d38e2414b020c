//! Authentication/authorization failure taxonomy.

use thiserror::Error;

use crate::RoleSet;

/// Precise reason a request was not let through.
///
/// Every variant except [`AuthError::Forbidden`] collapses to the same
/// wire-visible [`Rejection::Unauthenticated`]; the distinction is for logs and
/// tests only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no bearer credential supplied")]
    MissingCredential,

    #[error("credential is not a decodable token: {0}")]
    MalformedCredential(String),

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token claims are invalid: {0}")]
    ClaimsInvalid(String),

    #[error("forbidden: requires one of [{required}]")]
    Forbidden { required: RoleSet },
}

/// Stable, log-friendly discriminant of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    MissingCredential,
    MalformedCredential,
    SignatureInvalid,
    Expired,
    ClaimsInvalid,
    Forbidden,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingCredential => "missing_credential",
            AuthErrorKind::MalformedCredential => "malformed_credential",
            AuthErrorKind::SignatureInvalid => "signature_invalid",
            AuthErrorKind::Expired => "expired",
            AuthErrorKind::ClaimsInvalid => "claims_invalid",
            AuthErrorKind::Forbidden => "forbidden",
        }
    }
}

impl core::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller is allowed to learn about a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// 401-equivalent. Carries no detail about which check failed.
    Unauthenticated,
    /// 403-equivalent. The caller is known; only the required roles are disclosed.
    Forbidden { required: RoleSet },
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::MissingCredential => AuthErrorKind::MissingCredential,
            AuthError::MalformedCredential(_) => AuthErrorKind::MalformedCredential,
            AuthError::SignatureInvalid => AuthErrorKind::SignatureInvalid,
            AuthError::Expired => AuthErrorKind::Expired,
            AuthError::ClaimsInvalid(_) => AuthErrorKind::ClaimsInvalid,
            AuthError::Forbidden { .. } => AuthErrorKind::Forbidden,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Forbidden { .. })
    }

    pub fn rejection(&self) -> Rejection {
        match self {
            AuthError::Forbidden { required } => Rejection::Forbidden {
                required: required.clone(),
            },
            _ => Rejection::Unauthenticated,
        }
    }
}
