mod handlers;
mod session;

pub use handlers::AggregateMode;
pub use session::{session_middleware, RequestContext, SESSION_COOKIE};

use crate::components::google_calendar::RoomEventQuery;
use crate::components::oauth::{
    CredentialFile, OAuthClient, TokenEndpoint, UserCredential, AUTHORIZE_PATH, CALLBACK_PATH,
};
use crate::components::rooms::RoomRegistry;
use crate::components::session::SessionStore;
use axum::extract::FromRef;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// OAuth client configuration
    pub oauth: Arc<OAuthClient>,
    /// Token endpoint used for the code exchange
    pub tokens: Arc<dyn TokenEndpoint>,
    /// Room calendar query service
    pub query: Arc<RoomEventQuery>,
    /// Known rooms
    pub rooms: Arc<RoomRegistry>,
    /// Where sessions live between requests
    pub sessions: Arc<dyn SessionStore>,
    /// Optional file mirroring the latest credential
    pub credential_file: Option<Arc<CredentialFile>>,
    /// Credential read from that file at startup, used for sessions holding no tokens
    pub stored_credential: Option<Arc<UserCredential>>,
    /// Key signing the session cookie
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the gateway's router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route(AUTHORIZE_PATH, get(handlers::authorize_handler))
        .route(CALLBACK_PATH, get(handlers::callback_handler))
        .route("/rooms", get(handlers::rooms_handler))
        .route("/room/all", get(handlers::all_rooms_handler))
        .route("/room/{name}", get(handlers::room_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), session_middleware)),
        )
        .with_state(state)
}
