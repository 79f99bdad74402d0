use super::{Session, SessionRecord, SessionStore};
use crate::error::GatewayResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory session store, used when no Redis is configured
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// All stored sessions
    pub async fn sessions(&self) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .iter()
            .map(|(id, record)| Session::from_record(id, record.clone()))
            .collect()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> GatewayResult<Session> {
        let sessions = self.sessions.read().await;
        Ok(match sessions.get(id) {
            Some(record) => Session::from_record(id, record.clone()),
            None => Session::new(id),
        })
    }

    async fn save(&self, session: &Session) -> GatewayResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id().to_string(), session.record().clone());
        Ok(())
    }
}
