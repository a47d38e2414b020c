//! `gatehouse-auth` — bearer-token verification and role gating.
//!
//! This crate is intentionally decoupled from HTTP and storage: it sees raw
//! header values and returns identities or typed failures.

pub mod claims;
pub mod error;
pub mod gate;
pub mod identity;
pub mod roles;
pub mod verifier;

pub use claims::TokenClaims;
pub use error::{AuthError, AuthErrorKind, Rejection};
pub use gate::{AuthGate, BEARER_SCHEME, authorize_identity, extract_bearer};
pub use identity::{Identity, SubjectId};
pub use roles::{Role, RoleSet};
pub use verifier::{DEFAULT_AUDIENCE, Hs256Verifier, SharedSecret, TokenVerifier, VerifierConfig};
