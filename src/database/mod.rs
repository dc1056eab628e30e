pub mod catalog;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};

pub use catalog::Catalog;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

/// Build the catalog selected by configuration, migrating first when asked to
pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Catalog>, DatabaseError> {
    match config.backend {
        DatabaseBackend::Memory => {
            info!("Using in-memory catalog");
            Ok(Arc::new(MemoryCatalog::new()))
        }
        DatabaseBackend::Postgres => {
            let pool = DatabaseManager::connect(config).await?;
            if config.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Ok(Arc::new(PgCatalog::new(pool)))
        }
    }
}
