use super::client::CalendarApi;
use super::filter::filter_events;
use super::models::{CalendarEvent, EventList, ProviderResponse};
use super::time::{staleness_cutoff, QueryWindow};
use crate::components::oauth::{TokenEndpoint, UserCredential};
use crate::error::{google_calendar_error, GatewayResult};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of querying one room calendar
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvents {
    /// The provider answered 200; these are the events that passed the filters
    Filtered(Vec<CalendarEvent>),
    /// The provider answered with an error, passed on as-is
    Upstream(ProviderResponse),
}

impl IntoResponse for RoomEvents {
    fn into_response(self) -> Response {
        match self {
            RoomEvents::Filtered(events) => Json(events).into_response(),
            RoomEvents::Upstream(response) => {
                let status =
                    StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, [(header::CONTENT_TYPE, "application/json")], response.body).into_response()
            }
        }
    }
}

/// Queries room calendars over the audit window and filters the results
pub struct RoomEventQuery {
    calendar: Arc<dyn CalendarApi>,
    tokens: Arc<dyn TokenEndpoint>,
    window: QueryWindow,
    cutoff: DateTime<Utc>,
}

impl RoomEventQuery {
    pub fn new(
        calendar: Arc<dyn CalendarApi>,
        tokens: Arc<dyn TokenEndpoint>,
        window: QueryWindow,
    ) -> Self {
        Self {
            calendar,
            tokens,
            window,
            cutoff: staleness_cutoff(),
        }
    }

    /// Fetch the events of one calendar with a single provider request.
    ///
    /// The credential is refreshed first if its access token has expired, so
    /// the caller must write it back to the session afterwards.
    pub async fn events_for(
        &self,
        calendar_id: &str,
        credential: &mut UserCredential,
    ) -> GatewayResult<RoomEvents> {
        credential
            .refresh_if_expired(self.tokens.as_ref(), Utc::now())
            .await?;

        let access_token = credential
            .access_token
            .as_deref()
            .ok_or_else(|| google_calendar_error("No access token available"))?;

        let response = self
            .calendar
            .list_events(calendar_id, &self.window.events_query(), access_token)
            .await?;

        if !response.is_ok() {
            warn!(
                "Calendar API answered HTTP {} for calendar {}",
                response.status, calendar_id
            );
            return Ok(RoomEvents::Upstream(response));
        }

        let list: EventList = serde_json::from_str(&response.body)
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        let total = list.items.len();
        let events = filter_events(list.items, self.cutoff);
        debug!(
            "Kept {} of {} events for calendar {}",
            events.len(),
            total,
            calendar_id
        );

        Ok(RoomEvents::Filtered(events))
    }
}
