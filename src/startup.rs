use crate::components::google_calendar::{GoogleCalendarClient, QueryWindow, RoomEventQuery};
use crate::components::oauth::{CredentialFile, GoogleTokenEndpoint, OAuthClient};
use crate::components::rooms::RoomRegistry;
use crate::components::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::config::Config;
use crate::error::{other_error, Error, GatewayResult};
use crate::shutdown;
use crate::web::{self, AppState};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the shared state from configuration
pub async fn build_state(config: &Config) -> GatewayResult<AppState> {
    let oauth = Arc::new(OAuthClient::from_config(config));
    info!("OAuth redirect URI is {}", oauth.redirect_uri);

    let http = reqwest::Client::builder()
        .user_agent(concat!("room-warden/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| other_error(&format!("Failed to build HTTP client: {}", e)))?;

    let tokens = Arc::new(GoogleTokenEndpoint::new(Arc::clone(&oauth), http.clone()));
    let calendar = Arc::new(GoogleCalendarClient::new(http));
    let query = Arc::new(RoomEventQuery::new(
        calendar,
        tokens.clone(),
        QueryWindow::room_audit()?,
    ));

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisSessionStore::new(url)?),
        None => {
            info!("REDIS_URL not set, keeping sessions in memory");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let cookie_key = match &config.session_secret {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => {
            warn!("SESSION_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let (credential_file, stored_credential) = match &config.credential_store_file {
        Some(path) => {
            let file = CredentialFile::new(path.clone());
            let stored = match file.read().await {
                Ok(Some(credential)) if credential.is_authorized() => {
                    info!("Using stored credential from {}", file.path().display());
                    Some(Arc::new(credential))
                }
                Ok(_) => None,
                Err(e) => {
                    warn!("Ignoring unreadable credential file {}: {}", file.path().display(), e);
                    None
                }
            };
            (Some(Arc::new(file)), stored)
        }
        None => (None, None),
    };

    let rooms = RoomRegistry::builtin();
    info!("Serving {} room calendars", rooms.len());

    Ok(AppState {
        oauth,
        tokens,
        query,
        rooms: Arc::new(rooms),
        sessions,
        credential_file,
        stored_credential,
        cookie_key,
    })
}

/// Build the state and serve HTTP until a shutdown signal arrives
pub async fn start_server(config: Config) -> miette::Result<()> {
    let state = build_state(&config).await?;
    let app = web::router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
