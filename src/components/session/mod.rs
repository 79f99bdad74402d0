mod memory;
mod redis_store;

pub use self::memory::InMemorySessionStore;
pub use self::redis_store::RedisSessionStore;

use crate::components::oauth::UserCredential;
use crate::error::GatewayResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored fields of a browser session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// `state` sent with the pending authorization request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_state: Option<String>,
}

/// A browser session: its id plus the record kept for it in the store
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    record: SessionRecord,
}

impl Session {
    pub fn new(id: &str) -> Self {
        Self::from_record(id, SessionRecord::default())
    }

    pub fn from_record(id: &str, record: SessionRecord) -> Self {
        Self {
            id: id.to_string(),
            record,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn access_token(&self) -> Option<&str> {
        self.record.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.record.refresh_token.as_deref()
    }

    pub fn expires_in(&self) -> Option<i64> {
        self.record.expires_in
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.record.issued_at
    }

    pub fn set_oauth_state(&mut self, state: &str) {
        self.record.oauth_state = Some(state.to_string());
    }

    /// Remove and return the pending authorization `state`
    pub fn take_oauth_state(&mut self) -> Option<String> {
        self.record.oauth_state.take()
    }

    /// Overwrite the four token fields with the credential's values
    pub fn store_credential(&mut self, credential: &UserCredential) {
        self.record.access_token = credential.access_token.clone();
        self.record.refresh_token = credential.refresh_token.clone();
        self.record.expires_in = credential.expires_in;
        self.record.issued_at = credential.issued_at;
    }
}

/// Storage backend for sessions
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Load a session, or an empty one if the id is unknown
    async fn load(&self, id: &str) -> GatewayResult<Session>;

    /// Persist a session under its id
    async fn save(&self, session: &Session) -> GatewayResult<()>;
}
