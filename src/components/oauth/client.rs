use crate::config::{Config, GOOGLE_AUTH_URI, GOOGLE_TOKEN_URI};
use crate::error::{config_error, GatewayResult};
use std::fmt;
use url::Url;

/// Read-only access to the user's calendars
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Path the provider redirects back to after consent
pub const CALLBACK_PATH: &str = "/oauth2callback";

/// Process-wide OAuth client configuration, built once at startup
#[derive(Clone, PartialEq)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub scope: String,
    pub login_hint: Option<String>,
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("login_hint", &self.login_hint)
            .finish()
    }
}

impl OAuthClient {
    /// Client for Google's endpoints with the read-only calendar scope
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            auth_uri: GOOGLE_AUTH_URI.to_string(),
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scope: CALENDAR_READONLY_SCOPE.to_string(),
            login_hint: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self {
            auth_uri: config.google_auth_uri.clone(),
            token_uri: config.google_token_uri.clone(),
            ..Self::new(
                &config.google_client_id,
                &config.google_client_secret,
                &format!("{}{}", config.public_url, CALLBACK_PATH),
            )
        };

        match &config.login_hint {
            Some(hint) => client.with_login_hint(hint),
            None => client,
        }
    }

    pub fn with_login_hint(mut self, hint: &str) -> Self {
        self.login_hint = Some(hint.to_string());
        self
    }

    /// Consent URL asking for offline access.
    ///
    /// `prompt=consent` makes the provider issue a refresh token on every
    /// login, not only the first one.
    pub fn authorization_uri(&self, state: &str) -> GatewayResult<Url> {
        let mut url = Url::parse(&self.auth_uri)
            .map_err(|e| config_error(&format!("Invalid authorization URI: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("scope", &self.scope)
                .append_pair("access_type", "offline")
                .append_pair("prompt", "consent")
                .append_pair("state", state);
            if let Some(hint) = &self.login_hint {
                query.append_pair("login_hint", hint);
            }
        }

        Ok(url)
    }
}
