use crate::components::google_calendar::{DeleteSummary, Event};
use crate::error::{transport_error, AppResult};
use crate::web::auth::SESSION_COOKIE;
use crate::web::dto::{DeleteEventsRequest, EventsResponse, SessionResponse};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use url::Url;

/// What the event list view needs from the server
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetch the signed-in user's upcoming events
    async fn fetch_events(&self) -> AppResult<Vec<Event>>;

    /// Delete the given events in one batch
    async fn delete_events(&self, event_ids: &[String]) -> AppResult<DeleteSummary>;
}

/// `EventsApi` over the service's JSON endpoints
#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    client: Client,
    base_url: Url,
    session_token: Option<String>,
}

impl HttpEventsApi {
    /// Create a client for the server at `base_url`, signed in with `session_token` if given
    pub fn new(base_url: &str, session_token: Option<String>) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| transport_error(&format!("Invalid server URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            session_token,
        })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| transport_error(&format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Attach the session cookie the way a browser would
    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => request.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> AppResult<Response> {
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to {}: {}", what, e)))?;

        if !response.status().is_success() {
            return Err(transport_error(&format!(
                "Failed to {}: HTTP {}",
                what,
                response.status()
            )));
        }

        Ok(response)
    }

    /// Ask the server whether the session is signed in
    pub async fn session(&self) -> AppResult<SessionResponse> {
        let url = self.endpoint("/api/auth/session")?;
        let response = self.send(self.client.get(url), "load session").await?;

        response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse session response: {}", e)))
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn fetch_events(&self) -> AppResult<Vec<Event>> {
        let url = self.endpoint("/api/events")?;
        let response = self.send(self.client.get(url), "fetch events").await?;

        let body: EventsResponse = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(body.events)
    }

    async fn delete_events(&self, event_ids: &[String]) -> AppResult<DeleteSummary> {
        let url = self.endpoint("/api/events/delete")?;
        let request = self.client.post(url).json(&DeleteEventsRequest {
            event_ids: Some(event_ids.to_vec()),
        });
        let response = self.send(request, "delete events").await?;

        response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse delete response: {}", e)))
    }
}
