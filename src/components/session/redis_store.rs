use super::{Session, SessionRecord, SessionStore};
use crate::error::{session_error, GatewayResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::info;

/// Redis keys
mod keys {
    pub const SESSION_PREFIX: &str = "warden:session:";
    /// 30 days in seconds
    pub const EXPIRY_SECONDS: u64 = 30 * 24 * 60 * 60;
}

/// Session store keeping one JSON value per session in Redis
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a store for the given Redis URL
    pub fn new(redis_url: &str) -> GatewayResult<Self> {
        info!("Using Redis session store");

        let client = RedisClient::open(redis_url)
            .map_err(|e| session_error(&format!("Failed to create Redis client: {}", e)))?;

        Ok(Self { client })
    }

    fn key(id: &str) -> String {
        format!("{}{}", keys::SESSION_PREFIX, id)
    }

    async fn get_connection(&self) -> GatewayResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| session_error(&format!("Failed to connect to Redis: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> GatewayResult<Session> {
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn
            .get(Self::key(id))
            .await
            .map_err(|e| session_error(&format!("Redis GET error: {}", e)))?;

        let record = match data {
            Some(data) => serde_json::from_str::<SessionRecord>(&data)
                .map_err(|e| session_error(&format!("Failed to parse session JSON: {}", e)))?,
            None => SessionRecord::default(),
        };

        Ok(Session::from_record(id, record))
    }

    async fn save(&self, session: &Session) -> GatewayResult<()> {
        let data = serde_json::to_string(session.record())?;
        let mut conn = self.get_connection().await?;

        conn.set_ex::<_, _, ()>(Self::key(session.id()), data, keys::EXPIRY_SECONDS)
            .await
            .map_err(|e| session_error(&format!("Redis SET error: {}", e)))?;

        Ok(())
    }
}
