//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

use gatehouse_auth::{DEFAULT_AUDIENCE, SharedSecret, VerifierConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Everything the service needs, passed by value into [`crate::app::build_app`].
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub verifier: VerifierConfig,
    pub bind_addr: SocketAddr,
    /// Postgres connection string for the profile store; `None` = in-memory.
    pub database_url: Option<String>,
}

impl GateConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret = non_empty("SUPABASE_JWT_SECRET")
            .or_else(|| non_empty("JWT_SECRET"))
            .ok_or(ConfigError::Missing("SUPABASE_JWT_SECRET"))?;

        let audience = non_empty("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());

        let require_expiry = match non_empty("JWT_REQUIRE_EXP") {
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                name: "JWT_REQUIRE_EXP",
                reason: format!("expected true/false, got '{v}'"),
            })?,
            None => true,
        };

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let verifier = VerifierConfig::new(SharedSecret::new(secret.into_bytes()))
            .with_audience(audience)
            .with_require_expiry(require_expiry);

        Ok(Self {
            verifier,
            bind_addr,
            database_url: non_empty("DATABASE_URL"),
        })
    }

    /// Config for tests and embedding: defaults plus the given secret.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            verifier: VerifierConfig::new(SharedSecret::new(secret)),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<GateConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GateConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("SUPABASE_JWT_SECRET"));
        assert_eq!(
            load(&[("SUPABASE_JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::Missing("SUPABASE_JWT_SECRET")
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("SUPABASE_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.verifier.audience, "authenticated");
        assert!(cfg.verifier.require_expiry);
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.verifier.secret.as_bytes(), b"s3cret");
    }

    #[test]
    fn fallback_secret_name_is_accepted() {
        let cfg = load(&[("JWT_SECRET", "legacy")]).unwrap();
        assert_eq!(cfg.verifier.secret.as_bytes(), b"legacy");
    }

    #[test]
    fn overrides_apply() {
        let cfg = load(&[
            ("SUPABASE_JWT_SECRET", "s3cret"),
            ("JWT_AUDIENCE", "service"),
            ("JWT_REQUIRE_EXP", "false"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/app"),
        ])
        .unwrap();
        assert_eq!(cfg.verifier.audience, "service");
        assert!(!cfg.verifier.require_expiry);
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/app"));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load(&[("SUPABASE_JWT_SECRET", "s"), ("JWT_REQUIRE_EXP", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_REQUIRE_EXP", .. }));

        let err = load(&[("SUPABASE_JWT_SECRET", "s"), ("BIND_ADDR", "nope")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BIND_ADDR", .. }));
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = load(&[("SUPABASE_JWT_SECRET", "do-not-print-me")]).unwrap();
        assert!(!format!("{cfg:?}").contains("do-not-print-me"));
    }
}
