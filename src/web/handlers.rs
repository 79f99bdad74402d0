use super::session::RequestContext;
use super::AppState;
use crate::components::google_calendar::RoomEvents;
use crate::error::{authorization_error, GatewayResult};
use axum::extract::{Extension, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

/// 302 redirect to `location`
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Handler for the index page
pub async fn index_handler() -> &'static str {
    "You have allowed the app to read the room calendars for you."
}

/// Handler for the health check
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Start the authorization flow: remember a fresh `state` and send the
/// browser to the consent screen
pub async fn authorize_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> GatewayResult<Response> {
    let oauth_state = Uuid::new_v4().to_string();
    ctx.session.lock().await.set_oauth_state(&oauth_state);

    let uri = state.oauth.authorization_uri(&oauth_state)?;
    Ok(found(uri.as_str()))
}

/// Query parameters the provider sends back after consent
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Exchange the authorization code for tokens
pub async fn callback_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<CallbackParams>,
) -> GatewayResult<Response> {
    let expected_state = ctx.session.lock().await.take_oauth_state();

    if let Some(error) = params.error {
        return Err(authorization_error(&format!("Authorization was not granted: {}", error)));
    }
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| authorization_error("Missing authorization code"))?;
    if expected_state.is_none() || params.state != expected_state {
        return Err(authorization_error("Authorization state does not match this session"));
    }

    let grant = state.tokens.exchange_code(&code).await?;
    ctx.credential.lock().await.apply_grant(grant, Utc::now());
    info!("User authorized the gateway");

    Ok(found("/"))
}

/// List the known room names, sorted
pub async fn rooms_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.rooms.names().into_iter().map(str::to_string).collect())
}

/// Filtered events of one room
pub async fn room_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(name): Path<String>,
) -> GatewayResult<Response> {
    let Some(calendar_id) = state.rooms.calendar_id(&name) else {
        warn!("Unknown room requested: {}", name);
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let mut credential = ctx.credential.lock().await;
    let events = state.query.events_for(calendar_id, &mut credential).await?;

    Ok(events.into_response())
}

/// How `/room/all` combines the rooms' events
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateMode {
    /// Every filtered event of every room
    #[default]
    All,
    /// Only the last filtered event of each room
    Latest,
}

#[derive(Debug, Deserialize)]
pub struct AggregateParams {
    #[serde(default)]
    mode: AggregateMode,
}

/// Filtered events of every room in one list
pub async fn all_rooms_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<AggregateParams>,
) -> GatewayResult<Response> {
    let mut credential = ctx.credential.lock().await;
    let mut aggregated = Vec::new();

    for (name, calendar_id) in state.rooms.iter() {
        match state.query.events_for(calendar_id, &mut credential).await? {
            RoomEvents::Filtered(events) => match params.mode {
                AggregateMode::All => aggregated.extend(events),
                AggregateMode::Latest => aggregated.extend(events.into_iter().last()),
            },
            upstream @ RoomEvents::Upstream(_) => {
                warn!("Stopping aggregation at room {}", name);
                return Ok(upstream.into_response());
            }
        }
    }

    Ok(Json(aggregated).into_response())
}
