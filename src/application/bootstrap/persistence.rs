use anyhow::{Context, Result};
use tracing::info;

use crate::config::DatabaseEnvConfig;
use crate::infrastructure::persistence::Database;

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &DatabaseEnvConfig) -> Result<Database> {
        info!("Initializing Database at {}", config.url);

        Database::new(&config.url, config.max_connections)
            .await
            .context("Failed to initialize database")
    }
}
