use std::sync::Arc;

use crate::config::GateConfig;
use crate::profiles::{InMemoryProfileStore, PostgresProfileStore, ProfileStore, ProfileStoreError};

/// Collaborators shared by handlers (read-only after startup).
#[derive(Clone)]
pub struct AppServices {
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppServices {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }
}

/// Pick the profile store for this process.
///
/// Without `DATABASE_URL` the service runs against an empty in-memory store.
pub fn profile_store_from_config(config: &GateConfig) -> Result<Arc<dyn ProfileStore>, ProfileStoreError> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres profile store");
            Ok(Arc::new(PostgresProfileStore::connect_lazy(url)?))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using empty in-memory profile store");
            Ok(Arc::new(InMemoryProfileStore::new()))
        }
    }
}
