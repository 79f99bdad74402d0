use super::token::{TokenEndpoint, TokenGrant};
use crate::components::session::Session;
use crate::error::GatewayResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The signed-in user's OAuth tokens for the current request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCredential {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds
    pub expires_in: Option<i64>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl UserCredential {
    /// Derive the request credential from the tokens kept in the session
    pub fn from_session(session: &Session) -> Self {
        Self {
            access_token: session.access_token().map(str::to_string),
            refresh_token: session.refresh_token().map(str::to_string),
            expires_in: session.expires_in(),
            issued_at: session.issued_at(),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    /// When the access token stops being valid, if known
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let issued_at = self.issued_at?;
        let expires_in = self.expires_in?;
        issued_at.checked_add_signed(Duration::seconds(expires_in))
    }

    /// A token with unknown lifetime is treated as still valid
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }

    /// Take over the tokens of a fresh grant issued at `now`
    pub fn apply_grant(&mut self, grant: TokenGrant, now: DateTime<Utc>) {
        self.access_token = Some(grant.access_token);
        // Refresh responses omit the refresh token; keep the one we have
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        self.expires_in = grant.expires_in;
        self.issued_at = Some(now);
    }

    /// Refresh the access token if it has expired and a refresh token is
    /// available. Returns whether a refresh happened.
    pub async fn refresh_if_expired(
        &mut self,
        tokens: &dyn TokenEndpoint,
        now: DateTime<Utc>,
    ) -> GatewayResult<bool> {
        if !self.is_expired(now) {
            return Ok(false);
        }
        let Some(refresh_token) = self.refresh_token.clone() else {
            return Ok(false);
        };

        let grant = tokens.refresh(&refresh_token).await?;
        self.apply_grant(grant, now);
        info!("Refreshed expired access token");

        Ok(true)
    }
}
