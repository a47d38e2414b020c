//! Local bearer-token verification (HS256 against a shared secret).
//!
//! Tokens are checked in-process; the issuing auth service is never called at
//! request time.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::{AuthError, Identity, TokenClaims};

/// Audience the hosted auth provider stamps on user access tokens.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Symmetric signing secret shared with the token issuer.
///
/// The `Debug` impl never prints the bytes.
#[derive(Clone)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Verifier settings. Read-only once the verifier is built.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub secret: SharedSecret,
    pub audience: String,
    /// Reject tokens that carry no `exp` claim.
    pub require_expiry: bool,
}

impl VerifierConfig {
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            audience: DEFAULT_AUDIENCE.to_string(),
            require_expiry: true,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_require_expiry(mut self, require_expiry: bool) -> Self {
        self.require_expiry = require_expiry;
        self
    }
}

/// Turns an opaque credential into an [`Identity`], or fails explicitly.
///
/// `now` is supplied by the caller; implementations must not read the clock
/// or perform I/O.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, credential: &str, now: DateTime<Utc>) -> Result<Identity, AuthError>;
}

/// HS256 verifier backed by `jsonwebtoken`.
#[derive(Clone)]
pub struct Hs256Verifier {
    key: DecodingKey,
    validation: Validation,
    require_expiry: bool,
}

impl Hs256Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.audience.as_str()]);
        // Expiry is checked against the caller-supplied clock below.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        // `exp` presence is governed by `require_expiry`; `aud` is always required.
        validation.set_required_spec_claims(&["aud"]);

        if !config.require_expiry {
            tracing::warn!("token verifier accepts tokens without an exp claim; such tokens never expire");
        }

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            require_expiry: config.require_expiry,
        }
    }
}

impl core::fmt::Debug for Hs256Verifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Verifier")
            .field("audience", &self.validation.aud)
            .field("require_expiry", &self.require_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier for Hs256Verifier {
    fn verify(&self, credential: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let data = jsonwebtoken::decode::<TokenClaims>(credential, &self.key, &self.validation)
            .map_err(map_decode_error)?;
        let claims = data.claims;

        let expires_at = match claims.exp {
            Some(exp) => {
                let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).ok_or_else(|| {
                    AuthError::MalformedCredential("exp is out of range".to_string())
                })?;
                if expires_at <= now {
                    return Err(AuthError::Expired);
                }
                Some(expires_at)
            }
            None if self.require_expiry => {
                return Err(AuthError::ClaimsInvalid("missing exp".to_string()));
            }
            None => None,
        };

        Ok(Identity::from_claims(claims, expires_at))
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::SignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidAudience => AuthError::ClaimsInvalid("audience mismatch".to_string()),
        ErrorKind::InvalidIssuer => AuthError::ClaimsInvalid("issuer mismatch".to_string()),
        ErrorKind::InvalidSubject => AuthError::ClaimsInvalid("subject mismatch".to_string()),
        ErrorKind::ImmatureSignature => AuthError::ClaimsInvalid("token not yet valid".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::ClaimsInvalid(format!("missing {claim}"))
        }
        ErrorKind::InvalidToken => AuthError::MalformedCredential("not a jwt".to_string()),
        ErrorKind::Base64(_) => AuthError::MalformedCredential("invalid base64".to_string()),
        ErrorKind::Json(e) => AuthError::MalformedCredential(format!("invalid json: {e}")),
        ErrorKind::Utf8(_) => AuthError::MalformedCredential("invalid utf-8".to_string()),
        other => AuthError::MalformedCredential(format!("{other:?}")),
    }
}
