use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthError, Identity, RoleSet, TokenVerifier};

/// Scheme expected in the `Authorization` header and echoed in challenges.
pub const BEARER_SCHEME: &str = "Bearer";

/// Mediates between inbound requests and the [`TokenVerifier`].
///
/// Transport-agnostic: callers hand over the raw `Authorization` header value
/// (if any). Each call is a single synchronous check with no retries; the
/// only shared state is the read-only verifier.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Required authentication: an identity, or a rejection.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let result = extract_bearer(authorization)
            .and_then(|credential| self.verifier.verify(credential, now));

        match &result {
            Ok(identity) => {
                tracing::debug!(subject = %identity.subject, role = %identity.role, "request authenticated");
            }
            Err(AuthError::MissingCredential) => {
                tracing::debug!(kind = %AuthError::MissingCredential.kind(), "authentication rejected");
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), reason = %err, "authentication rejected");
            }
        }

        result
    }

    /// Optional authentication: never rejects, degrades to anonymous.
    pub fn authenticate_optional(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<Identity> {
        let credential = extract_bearer(authorization).ok()?;
        match self.verifier.verify(credential, now) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::debug!(kind = %err.kind(), "ignoring invalid credential on optional route");
                None
            }
        }
    }

    /// Role-gated authentication: authenticate, then require a role in `allowed`.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        allowed: &RoleSet,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let identity = self.authenticate(authorization, now)?;
        authorize_identity(&identity, allowed)?;
        Ok(identity)
    }
}

impl core::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

/// Pure role check on an already-authenticated identity.
///
/// - No IO
/// - No panics
pub fn authorize_identity(identity: &Identity, allowed: &RoleSet) -> Result<(), AuthError> {
    if identity.has_any_role(allowed) {
        return Ok(());
    }

    tracing::warn!(
        subject = %identity.subject,
        role = %identity.role,
        required = %allowed,
        "authorization denied"
    );
    Err(AuthError::Forbidden {
        required: allowed.clone(),
    })
}

/// Pull the bearer credential out of a raw `Authorization` header value.
///
/// An absent header, a different scheme and an empty token are all treated as
/// "no credential".
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingCredential)?.trim();

    let (scheme, token) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::MissingCredential)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MissingCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};
    use proptest::prelude::*;
    use serde_json::json;

    use crate::{Hs256Verifier, Role, SharedSecret, VerifierConfig};

    const SECRET: &str = "gate-test-secret";

    fn gate() -> AuthGate {
        let verifier = Hs256Verifier::new(VerifierConfig::new(SharedSecret::new(SECRET)));
        AuthGate::new(Arc::new(verifier))
    }

    fn bearer(role: Option<&str>, exp: DateTime<Utc>) -> String {
        let mut claims = json!({
            "sub": "0b1c6f3e-1111-4a4a-9b9b-123456789abc",
            "aud": "authenticated",
            "exp": exp.timestamp(),
        });
        if let Some(role) = role {
            claims["role"] = json!(role);
        }
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn extract_bearer_accepts_case_insensitive_scheme() {
        assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(Some("bearer   abc  ")), Ok("abc"));
        assert_eq!(extract_bearer(Some("BEARER abc")), Ok("abc"));
    }

    #[test]
    fn extract_bearer_rejects_everything_else() {
        for header in [None, Some(""), Some("Bearer"), Some("Bearer   "), Some("Basic dXNlcjpwYXNz"), Some("abc")] {
            assert_eq!(extract_bearer(header), Err(AuthError::MissingCredential), "{header:?}");
        }
    }

    #[test]
    fn authenticate_without_header_is_missing_credential() {
        assert_eq!(gate().authenticate(None, Utc::now()), Err(AuthError::MissingCredential));
    }

    #[test]
    fn authenticate_passes_verifier_failure_through() {
        let now = Utc::now();
        let header = bearer(None, now - Duration::seconds(1));
        assert_eq!(gate().authenticate(Some(&header), now), Err(AuthError::Expired));
    }

    #[test]
    fn authenticate_with_valid_token_yields_identity() {
        let now = Utc::now();
        let header = bearer(Some("moderator"), now + Duration::minutes(1));
        let identity = gate().authenticate(Some(&header), now).unwrap();
        assert_eq!(identity.role, Role::MODERATOR);
        assert_eq!(identity.subject.as_str(), "0b1c6f3e-1111-4a4a-9b9b-123456789abc");
    }

    #[test]
    fn optional_returns_none_on_every_failure() {
        let now = Utc::now();
        let expired = bearer(None, now - Duration::seconds(1));
        let gate = gate();

        assert_eq!(gate.authenticate_optional(None, now), None);
        assert_eq!(gate.authenticate_optional(Some(""), now), None);
        assert_eq!(gate.authenticate_optional(Some("Bearer garbage"), now), None);
        assert_eq!(gate.authenticate_optional(Some(&expired), now), None);
    }

    #[test]
    fn optional_returns_identity_for_valid_token() {
        let now = Utc::now();
        let header = bearer(None, now + Duration::minutes(1));
        let identity = gate().authenticate_optional(Some(&header), now).unwrap();
        assert_eq!(identity.role, Role::AUTHENTICATED);
    }

    #[test]
    fn authorize_rejects_insufficient_role_as_forbidden() {
        let now = Utc::now();
        let header = bearer(Some("authenticated"), now + Duration::minutes(1));

        let err = gate().authorize(Some(&header), &RoleSet::admin(), now).unwrap_err();
        assert_eq!(err, AuthError::Forbidden { required: RoleSet::admin() });
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn authorize_checks_authentication_first() {
        let now = Utc::now();
        let err = gate().authorize(None, &RoleSet::admin(), now).unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);
    }

    #[test]
    fn authorize_admits_any_role_in_set() {
        let now = Utc::now();
        let gate = gate();
        for role in ["admin", "moderator"] {
            let header = bearer(Some(role), now + Duration::minutes(1));
            let identity = gate.authorize(Some(&header), &RoleSet::moderator(), now).unwrap();
            assert_eq!(identity.role.as_str(), role);
        }
    }

    proptest! {
        /// Property: optional authentication never rejects, whatever the header.
        #[test]
        fn optional_never_rejects(header in proptest::option::of(".{0,200}")) {
            let identity = gate().authenticate_optional(header.as_deref(), Utc::now());
            prop_assert!(identity.is_none());
        }
    }
}
