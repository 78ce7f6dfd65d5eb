// Export components
pub mod google_calendar;
pub mod session_store;

// Re-export the calendar gateway
pub use google_calendar::{CalendarGateway, GoogleCalendarGateway};
// Re-export session storage
pub use session_store::{InMemorySessionStore, RedisSessionStore, Session, SessionStore};
