use super::parse_env;
use anyhow::{Result, bail};
use chrono::Duration;

#[derive(Debug, Clone)]
pub struct SessionEnvConfig {
    pub ttl_minutes: i64,
}

impl Default for SessionEnvConfig {
    fn default() -> Self {
        Self { ttl_minutes: 60 }
    }
}

impl SessionEnvConfig {
    pub fn from_env() -> Result<Self> {
        let ttl_minutes = parse_env("SESSION_TTL_MINUTES", 60i64)?;
        if ttl_minutes < 1 {
            bail!("SESSION_TTL_MINUTES must be at least 1");
        }
        Ok(Self { ttl_minutes })
    }

    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }
}
