pub mod batch;
pub mod gateway;
pub mod models;
pub mod oauth;
pub mod time;

pub use batch::{delete_events, DeleteSummary};
pub use gateway::{CalendarGateway, GoogleCalendarGateway};
pub use models::{Event, EventTime};
pub use oauth::{GoogleOAuthClient, UserProfile};
