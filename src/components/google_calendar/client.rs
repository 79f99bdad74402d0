use super::models::{EventsQuery, ProviderResponse};
use crate::error::{google_calendar_error, GatewayResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Base URL of the Calendar v3 REST API
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Read access to calendar events
#[async_trait]
pub trait CalendarApi: Send + Sync + 'static {
    /// List events on `calendar_id`, returning the provider's reply untouched
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventsQuery,
        access_token: &str,
    ) -> GatewayResult<ProviderResponse>;
}

/// Calendar API client backed by reqwest
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, CALENDAR_API_BASE)
    }

    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the events list for a calendar, with the id percent-encoded
    pub fn events_url(&self, calendar_id: &str, query: &EventsQuery) -> GatewayResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API base URL cannot have a path"))?
            .extend(["calendars", calendar_id, "events"]);

        url.query_pairs_mut().extend_pairs(query.to_pairs());

        Ok(url)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventsQuery,
        access_token: &str,
    ) -> GatewayResult<ProviderResponse> {
        let url = self.events_url(calendar_id, query)?;
        debug!("Listing events for calendar {}", calendar_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to read events response: {}", e)))?;

        Ok(ProviderResponse { status, body })
    }
}
