//! Profile lookups against the hosted Postgres `profiles` table.
//!
//! Not on the verification path: used by admin routes and the readiness probe.
//! A missing profile (`Ok(None)`) and an unreachable store (`Err`) are kept
//! apart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use thiserror::Error;

use gatehouse_auth::SubjectId;

/// Row of the `profiles` table (the columns this service reads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: SubjectId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_premium: bool,
}

impl Profile {
    pub fn new(id: impl Into<SubjectId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            full_name: None,
            username: None,
            avatar_url: None,
            bio: None,
            is_premium: false,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileStoreError {
    /// Backing service could not be reached (connect/pool/IO failure).
    #[error("profile store unavailable: {0}")]
    Unavailable(String),

    /// Store answered but the query or row decoding failed.
    #[error("profile query failed: {0}")]
    Query(String),
}

#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: &SubjectId) -> Result<Option<Profile>, ProfileStoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), ProfileStoreError>;

    async fn user_exists(&self, id: &SubjectId) -> Result<bool, ProfileStoreError> {
        Ok(self.get_profile(id).await?.is_some())
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryProfileStore {
    inner: RwLock<HashMap<SubjectId, Profile>>,
    available: AtomicBool,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn insert(&self, profile: Profile) {
        // A panicked writer cannot leave the map half-updated; keep using it.
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(profile.id.clone(), profile);
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ProfileStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProfileStoreError::Unavailable("in-memory store offline".to_string()))
        }
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, id: &SubjectId) -> Result<Option<Profile>, ProfileStoreError> {
        self.check_available()?;
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(id).cloned())
    }

    async fn ping(&self) -> Result<(), ProfileStoreError> {
        self.check_available()
    }
}

/// Postgres-backed store (runtime queries, lazily connected pool).
#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Build a lazily-connecting pool; no connection is attempted here.
    pub fn connect_lazy(database_url: &str) -> Result<Self, ProfileStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy(database_url)
            .map_err(|e| ProfileStoreError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get_profile(&self, id: &SubjectId) -> Result<Option<Profile>, ProfileStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, email, display_name, full_name, username,
                   avatar_url, bio, COALESCE(is_premium, false) AS is_premium
            FROM profiles
            WHERE id::text = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_profile", e))?;

        row.map(|r| profile_from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("get_profile", e))
    }

    async fn ping(&self) -> Result<(), ProfileStoreError> {
        sqlx::query("SELECT id FROM profiles LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ping", e))
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: SubjectId::new(row.try_get::<String, _>("id")?),
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        full_name: row.try_get("full_name")?,
        username: row.try_get("username")?,
        avatar_url: row.try_get("avatar_url")?,
        bio: row.try_get("bio")?,
        is_premium: row.try_get("is_premium")?,
    })
}

fn map_sqlx_error(op: &'static str, err: sqlx::Error) -> ProfileStoreError {
    let unavailable = matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    );

    tracing::error!(op, error = %err, unavailable, "profile store error");

    if unavailable {
        ProfileStoreError::Unavailable(err.to_string())
    } else {
        ProfileStoreError::Query(err.to_string())
    }
}
