use crate::error::{config_error, env_error, GatewayResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the Google client secrets file
pub const DEFAULT_CLIENT_SECRETS_FILE: &str = "./secrets/client_secret.json";

/// Optional server settings file
pub const SERVER_SETTINGS_FILE: &str = "config/server.toml";

/// Google's default OAuth2 authorization endpoint
pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's default OAuth2 token endpoint
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Minimum length of the session cookie signing secret
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Main configuration structure for the gateway
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Authorization endpoint from the client secrets
    pub google_auth_uri: String,
    /// Token endpoint from the client secrets
    pub google_token_uri: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Externally visible base URL, used to build the OAuth redirect URI
    pub public_url: String,
    /// Optional `login_hint` passed to the consent screen
    pub login_hint: Option<String>,
    /// Secret used to sign the session cookie
    pub session_secret: Option<String>,
    /// Redis connection string for the session store
    pub redis_url: Option<String>,
    /// File the current credential is written to after each request
    pub credential_store_file: Option<PathBuf>,
}

/// OAuth client credentials as found in Google's `client_secret.json`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    web: Option<ClientSecrets>,
    installed: Option<ClientSecrets>,
}

/// Settings that may come from `config/server.toml`
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ServerSettings {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
    pub login_hint: Option<String>,
}

/// Parse a Google client secrets document, `web` section first
pub fn parse_client_secrets(json: &str) -> GatewayResult<ClientSecrets> {
    let file: ClientSecretsFile = serde_json::from_str(json)?;
    file.web
        .or(file.installed)
        .ok_or_else(|| config_error("Client secrets contain neither a 'web' nor an 'installed' section"))
}

/// Parse the optional server settings file
pub fn parse_server_settings(content: &str) -> GatewayResult<ServerSettings> {
    Ok(toml::from_str(content)?)
}

impl Config {
    /// Load configuration from environment, secrets and settings files
    pub fn load() -> GatewayResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let secrets = load_client_secrets()?;

        let settings = match fs::read_to_string(SERVER_SETTINGS_FILE) {
            Ok(content) => parse_server_settings(&content)?,
            Err(_) => ServerSettings::default(),
        };

        let bind_address = env::var("BIND_ADDRESS")
            .ok()
            .or(settings.bind_address)
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            Err(_) => settings.port.unwrap_or(3000),
        };

        let public_url = env::var("PUBLIC_URL")
            .ok()
            .or(settings.public_url)
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let login_hint = env::var("GOOGLE_LOGIN_HINT").ok().or(settings.login_hint);

        let session_secret = env::var("SESSION_SECRET").ok();
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(config_error(&format!(
                    "SESSION_SECRET must be at least {} bytes long",
                    MIN_SESSION_SECRET_LEN
                )));
            }
        }

        Ok(Config {
            google_client_id: secrets.client_id,
            google_client_secret: secrets.client_secret,
            google_auth_uri: secrets.auth_uri,
            google_token_uri: secrets.token_uri,
            bind_address,
            port,
            public_url: public_url.trim_end_matches('/').to_string(),
            login_hint,
            session_secret,
            redis_url: env::var("REDIS_URL").ok(),
            credential_store_file: env::var("CREDENTIAL_STORE_FILE").ok().map(PathBuf::from),
        })
    }
}

/// Resolve client secrets from the environment or the secrets file
fn load_client_secrets() -> GatewayResult<ClientSecrets> {
    if let Ok(json) = env::var("GOOGLE_CLIENT_SECRETS") {
        return parse_client_secrets(&json);
    }

    let path = env::var("GOOGLE_CLIENT_SECRETS_FILE")
        .unwrap_or_else(|_| DEFAULT_CLIENT_SECRETS_FILE.to_string());
    if Path::new(&path).exists() {
        let content = fs::read_to_string(&path)?;
        return parse_client_secrets(&content);
    }

    let client_id = env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
    let client_secret =
        env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

    Ok(ClientSecrets {
        client_id,
        client_secret,
        auth_uri: default_auth_uri(),
        token_uri: default_token_uri(),
    })
}
