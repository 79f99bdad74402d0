use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Calendar event as returned by the events list endpoint.
///
/// Only the fields the filters look at are typed; everything else is kept in
/// `extra` so events serialize back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "iCalUID", default, skip_serializing_if = "Option::is_none")]
    pub ical_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An event attendee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    /// Whether this entry represents the calendar owner
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
    #[serde(rename = "responseStatus", default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful events list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Raw provider reply, kept verbatim for passthrough
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Query parameters of an events list request
#[derive(Debug, Clone, PartialEq)]
pub struct EventsQuery {
    pub time_min: String,
    pub time_max: String,
    pub time_zone: String,
    pub order_by: String,
    pub single_events: bool,
    pub show_deleted: bool,
}

impl EventsQuery {
    /// Encode as URL query pairs using the API's parameter names
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeMin", self.time_min.clone()),
            ("timeMax", self.time_max.clone()),
            ("timeZone", self.time_zone.clone()),
            ("orderBy", self.order_by.clone()),
            ("singleEvents", self.single_events.to_string()),
            ("showDeleted", self.show_deleted.to_string()),
        ]
    }
}
