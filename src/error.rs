use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{error, warn};

/// Main error type for the gateway
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(room_warden::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(room_warden::config))]
    Config(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(room_warden::authorization))]
    Authorization(String),

    #[error("Token exchange error: {0}")]
    #[diagnostic(code(room_warden::token_exchange))]
    TokenExchange(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(room_warden::google_calendar))]
    GoogleCalendar(String),

    #[error("Session error: {0}")]
    #[diagnostic(code(room_warden::session))]
    Session(String),

    #[error(transparent)]
    #[diagnostic(code(room_warden::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(room_warden::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(room_warden::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// HTTP status a handler responds with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authorization(_) => StatusCode::BAD_REQUEST,
            Error::GoogleCalendar(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            // The caller can act on these, so only the message goes back
            Error::Authorization(message) => {
                warn!("Rejected authorization request: {}", message);
                (status, message.clone()).into_response()
            }
            _ => {
                error!("Request failed: {}", self);
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

/// Type alias for Result with our Error type
pub type GatewayResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authorization errors
pub fn authorization_error(message: &str) -> Error {
    Error::Authorization(message.to_string())
}

/// Helper to create token exchange errors
pub fn token_error(message: &str) -> Error {
    Error::TokenExchange(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create session errors
pub fn session_error(message: &str) -> Error {
    Error::Session(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
