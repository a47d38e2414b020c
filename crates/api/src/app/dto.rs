//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gatehouse_auth::Identity;

/// Public view of the caller's identity.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityDto {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
    pub exp: Option<DateTime<Utc>>,
}

impl From<&Identity> for IdentityDto {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.subject().to_string(),
            email: identity.email().map(str::to_string),
            role: identity.role().to_string(),
            exp: identity.expires_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeDto {
    pub authenticated: bool,
    pub id: Option<String>,
    pub role: Option<String>,
}

impl From<Option<&Identity>> for WelcomeDto {
    fn from(identity: Option<&Identity>) -> Self {
        Self {
            authenticated: identity.is_some(),
            id: identity.map(|i| i.subject().to_string()),
            role: identity.map(|i| i.role().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExistsDto {
    pub exists: bool,
}
