use super::models::Event;
use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Operations the service needs from the calendar provider
#[async_trait]
pub trait CalendarGateway: Send + Sync + 'static {
    /// List the upcoming events of the configured calendar
    async fn list_events(&self, access_token: &str) -> AppResult<Vec<Event>>;

    /// Delete a single event
    async fn delete_event(&self, access_token: &str, event_id: &str) -> AppResult<()>;
}

/// Body of an `events.list` response
#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<Event>,
}

/// Google Calendar REST implementation of the gateway
#[derive(Debug, Clone)]
pub struct GoogleCalendarGateway {
    client: Client,
    api_base: Url,
    calendar_id: String,
}

impl GoogleCalendarGateway {
    /// Create a gateway talking to `api_base` for the given calendar
    pub fn new(client: Client, api_base: &str, calendar_id: &str) -> AppResult<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| google_calendar_error(&format!("Invalid API base URL: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            calendar_id: calendar_id.to_string(),
        })
    }

    /// Create a gateway from the application config
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| google_calendar_error(&format!("Failed to build HTTP client: {}", e)))?;

        Self::new(client, &config.calendar_api_base, &config.calendar_id)
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]` with every segment percent-encoded
    fn events_url(&self, event_id: Option<&str>) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| google_calendar_error("API base URL cannot be a base"))?;
            segments
                .pop_if_empty()
                .push("calendars")
                .push(&self.calendar_id)
                .push("events");
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    async fn list_events(&self, access_token: &str) -> AppResult<Vec<Event>> {
        let mut url = self.events_url(None)?;

        // Only events that have not started yet
        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        url.query_pairs_mut().append_pair("timeMin", &time_min);

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Google Calendar list events failed: {}", e);
                google_calendar_error(&format!("Failed to fetch events: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!(
                "[Unexpected Response] Google Calendar list events returned HTTP {}",
                status
            );
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let page: EventsPage = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse events response: {}", e))
        })?;

        debug!("Fetched {} events", page.items.len());
        Ok(page.items)
    }

    async fn delete_event(&self, access_token: &str, event_id: &str) -> AppResult<()> {
        let url = self.events_url(Some(event_id))?;

        let response = self
            .client
            .delete(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                google_calendar_error(&format!("Failed to delete event {}: {}", event_id, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to delete event {}: HTTP {} - {}",
                event_id, status, error_body
            )));
        }

        Ok(())
    }
}
