use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Login session bound to one game player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub player_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues and resolves access tokens for logged-in players.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session for the player.
    async fn issue(&self, player_id: &str) -> Session;

    /// Player id owning a live token. Expired tokens resolve to `None`.
    async fn resolve(&self, token: &str) -> Option<String>;

    /// Drop one token. Returns whether it existed.
    async fn revoke(&self, token: &str) -> bool;

    /// Drop every session of a player. Returns how many were removed.
    async fn revoke_player(&self, player_id: &str) -> usize;
}
