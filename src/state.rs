use std::sync::Arc;

use crate::auth::SessionVerifier;
use crate::config::AppConfig;
use crate::database::{self, Catalog, DatabaseError, MemoryCatalog};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn Catalog>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Arc<dyn Catalog>) -> Self {
        let sessions = Arc::new(SessionVerifier::new(&config.security.jwt_secret));
        Self {
            config: Arc::new(config),
            catalog,
            sessions,
        }
    }

    /// Open the configured catalog and assemble the state around it
    pub async fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let catalog = database::open(&config.database).await?;
        Ok(Self::new(config, catalog))
    }

    /// In-memory state for tests and local demos
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(MemoryCatalog::new()))
    }
}
