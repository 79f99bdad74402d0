use super::client::OAuthClient;
use crate::error::{token_error, GatewayResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Token pair issued by the token endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Omitted by the provider on refresh
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// The OAuth2 token endpoint
#[async_trait]
pub trait TokenEndpoint: Send + Sync + 'static {
    /// Exchange an authorization code for tokens
    async fn exchange_code(&self, code: &str) -> GatewayResult<TokenGrant>;

    /// Get a new access token using a refresh token
    async fn refresh(&self, refresh_token: &str) -> GatewayResult<TokenGrant>;
}

/// Token endpoint client for Google
#[derive(Debug, Clone)]
pub struct GoogleTokenEndpoint {
    oauth: Arc<OAuthClient>,
    client: Client,
}

impl GoogleTokenEndpoint {
    pub fn new(oauth: Arc<OAuthClient>, client: Client) -> Self {
        Self { oauth, client }
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> GatewayResult<TokenGrant> {
        let response = self
            .client
            .post(&self.oauth.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| token_error(&format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(token_error(&format!(
                "Token endpoint returned HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| token_error(&format!("Failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl TokenEndpoint for GoogleTokenEndpoint {
    async fn exchange_code(&self, code: &str) -> GatewayResult<TokenGrant> {
        debug!("Exchanging authorization code");
        self.request_token(&[
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> GatewayResult<TokenGrant> {
        debug!("Refreshing access token");
        self.request_token(&[
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_grant() {
        let grant: TokenGrant = serde_json::from_str(
            r#"{
                "access_token": "ya29.a0",
                "expires_in": 3599,
                "refresh_token": "1//0g",
                "scope": "https://www.googleapis.com/auth/calendar.readonly",
                "token_type": "Bearer"
            }"#,
        )
        .unwrap();

        assert_eq!(grant.access_token, "ya29.a0");
        assert_eq!(grant.refresh_token.as_deref(), Some("1//0g"));
        assert_eq!(grant.expires_in, Some(3599));
    }

    #[test]
    fn test_parse_refresh_grant() {
        let grant: TokenGrant =
            serde_json::from_str(r#"{"access_token": "ya29.b1", "expires_in": 3599, "token_type": "Bearer"}"#)
                .unwrap();
        assert_eq!(grant.refresh_token, None);
    }

    #[test]
    fn test_grant_requires_access_token() {
        assert!(serde_json::from_str::<TokenGrant>(r#"{"error": "invalid_grant"}"#).is_err());
    }
}
