//! Database connection settings.

use super::parse_env;
use anyhow::{Result, bail};
use std::env;

#[derive(Debug, Clone)]
pub struct DatabaseEnvConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseEnvConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/stockdesk.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseEnvConfig {
    pub fn from_env() -> Result<Self> {
        let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5u32)?;
        if max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/stockdesk.db".to_string()),
            max_connections,
        })
    }
}
