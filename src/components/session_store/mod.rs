mod redis_store;

pub use redis_store::RedisSessionStore;

use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// OAuth tokens obtained at sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access token expiry as a unix timestamp
    pub expires_at: Option<i64>,
}

/// A signed-in browser session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub token: SessionToken,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh random id
    pub fn new(token: SessionToken, email: Option<String>, name: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            token,
            email,
            name,
            created_at: Utc::now(),
        }
    }

    /// Whether the session carries a usable access token
    pub fn is_authenticated(&self) -> bool {
        !self.token.access_token.is_empty()
    }
}

/// Storage for sessions keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get a session, `None` if unknown or expired
    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Store a session for `ttl_seconds`
    async fn put_session(&self, session: &Session, ttl_seconds: i64) -> AppResult<()>;

    /// Remove a session
    async fn delete_session(&self, session_id: &str) -> AppResult<()>;
}

/// In-memory implementation of the session store (fallback and tests)
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, (Session, DateTime<Utc>)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .filter(|(_, expires)| *expires > Utc::now())
            .map(|(session, _)| session.clone()))
    }

    async fn put_session(&self, session: &Session, ttl_seconds: i64) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        // Drop expired entries while holding the lock anyway
        sessions.retain(|_, (_, expires)| *expires > now);
        sessions.insert(
            session.id.clone(),
            (session.clone(), now + Duration::seconds(ttl_seconds)),
        );
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
