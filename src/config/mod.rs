//! Configuration module for stockdesk.
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file by the binary), grouped by concern: Server, Database, Game and
//! Session.

mod database_config;
mod game_config;
mod server_config;
mod session_config;

pub use database_config::DatabaseEnvConfig;
pub use game_config::GameEnvConfig;
pub use server_config::ServerEnvConfig;
pub use session_config::SessionEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub server: ServerEnvConfig,
    pub database: DatabaseEnvConfig,
    pub game: GameEnvConfig,
    pub session: SessionEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stockdesk".to_string(),
            server: ServerEnvConfig::default(),
            database: DatabaseEnvConfig::default(),
            game: GameEnvConfig::default(),
            session: SessionEnvConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "stockdesk".to_string());

        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let database = DatabaseEnvConfig::from_env().context("Failed to load database config")?;
        let game = GameEnvConfig::from_env().context("Failed to load game config")?;
        let session = SessionEnvConfig::from_env().context("Failed to load session config")?;

        Ok(Self {
            app_name,
            server,
            database,
            game,
            session,
        })
    }
}

/// Reads `key`, falling back to `default` when unset.
pub(crate) fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        Err(_) => Ok(default),
    }
}

