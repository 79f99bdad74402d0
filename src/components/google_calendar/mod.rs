mod client;
pub mod filter;
pub mod models;
mod query;
pub mod time;

pub use client::{CalendarApi, GoogleCalendarClient, CALENDAR_API_BASE};
pub use models::{Attendee, CalendarEvent, EventList, EventsQuery, ProviderResponse};
pub use query::{RoomEventQuery, RoomEvents};
pub use time::{staleness_cutoff, QueryWindow};
