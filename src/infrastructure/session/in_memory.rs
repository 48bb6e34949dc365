//! In-memory session store.
//!
//! Sessions live in an `Arc<RwLock<HashMap>>` keyed by token and are lost on
//! restart. Expired entries are pruned lazily whenever a new session is
//! issued.

use crate::domain::ports::{Session, SessionStore};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn issue(&self, player_id: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            player_id: player_id.to_string(),
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    async fn resolve(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| !s.is_expired(Utc::now()))
            .map(|s| s.player_id.clone())
    }

    async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    async fn revoke_player(&self, player_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.player_id != player_id);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let session = store.issue("player1").await;
        assert_eq!(store.resolve(&session.token).await.as_deref(), Some("player1"));
        assert_eq!(store.resolve("unknown").await, None);
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let store = InMemorySessionStore::new(Duration::zero());
        let session = store.issue("player1").await;
        assert_eq!(store.resolve(&session.token).await, None);
    }

    #[tokio::test]
    async fn test_issue_prunes_expired() {
        let store = InMemorySessionStore::new(Duration::zero());
        store.issue("a").await;
        store.issue("b").await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let s1 = store.issue("player1").await;
        store.issue("player1").await;
        store.issue("player2").await;

        assert!(store.revoke(&s1.token).await);
        assert!(!store.revoke(&s1.token).await);
        assert_eq!(store.revoke_player("player1").await, 1);
        assert_eq!(store.len().await, 1);
    }
}
