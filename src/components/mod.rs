// Export components
pub mod google_calendar;
pub mod oauth;
pub mod rooms;
pub mod session;
