use super::{Session, SessionStore};
use crate::error::{session_store_error, AppResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{debug, info};

/// Redis keys
mod keys {
    pub const SESSION_PREFIX: &str = "calendar_cleanup:session:";
}

/// Redis-backed session store
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a store for the given Redis URL and check that it is reachable
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| session_store_error(&format!("Failed to create Redis client: {}", e)))?;

        let store = Self { client };
        let mut conn = store.get_connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| session_store_error(&format!("Redis PING error: {}", e)))?;

        Ok(store)
    }

    /// Get a Redis connection from the client
    async fn get_connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| session_store_error(&format!("Failed to connect to Redis: {}", e)))
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", keys::SESSION_PREFIX, session_id)
    }
}

/// SETEX rejects zero and negative expiries
fn expiry_seconds(ttl_seconds: i64) -> u64 {
    u64::try_from(ttl_seconds).unwrap_or(0).max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        let mut conn = self.get_connection().await?;

        // Expired keys are removed by Redis itself
        let data: Option<String> = conn
            .get(Self::key(session_id))
            .await
            .map_err(|e| session_store_error(&format!("Redis GET error: {}", e)))?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put_session(&self, session: &Session, ttl_seconds: i64) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        let key = Self::key(&session.id);
        let json = serde_json::to_string(session)?;

        // Value and TTL in one SETEX so a key never outlives its session
        conn.set_ex::<_, _, ()>(&key, &json, expiry_seconds(ttl_seconds))
            .await
            .map_err(|e| session_store_error(&format!("Redis SETEX error: {}", e)))?;

        debug!("Stored session {}", session.id);
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let mut conn = self.get_connection().await?;

        conn.del::<_, ()>(Self::key(session_id))
            .await
            .map_err(|e| session_store_error(&format!("Redis DEL error: {}", e)))?;

        Ok(())
    }
}
