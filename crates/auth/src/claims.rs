use serde::{Deserialize, Serialize};

use crate::{Role, SubjectId};

/// Decoded token payload, as issued by the hosted auth provider.
///
/// Only the fields the gate reads are modelled; unknown claims are ignored.
/// `aud` is checked by the verifier before this struct is built.
/// Constructed per verification call and dropped once an [`crate::Identity`]
/// has been derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / user identifier.
    pub sub: SubjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Falls back to [`Role::AUTHENTICATED`] when the claim is absent.
    #[serde(default)]
    pub role: Role,

    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
