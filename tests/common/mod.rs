#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Response;
use calendar_cleanup::components::google_calendar::{CalendarGateway, Event, EventTime};
use calendar_cleanup::components::session_store::{
    InMemorySessionStore, Session, SessionStore, SessionToken,
};
use calendar_cleanup::config::Config;
use calendar_cleanup::error::{google_calendar_error, AppResult};
use calendar_cleanup::web::{AppState, SESSION_COOKIE};
use http_body_util::BodyExt;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCESS_TOKEN: &str = "test-access-token";

/// Calendar gateway that serves canned events and records every call
#[derive(Default)]
pub struct MockCalendarGateway {
    pub events: Vec<Event>,
    /// Event ids whose delete fails
    pub failing: HashSet<String>,
    pub fail_list: bool,
    pub list_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub deleted: Mutex<Vec<String>>,
    pub tokens: Mutex<Vec<String>>,
}

impl MockCalendarGateway {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, event_id: &str) -> Self {
        self.failing.insert(event_id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        let mut deleted = self.deleted.lock().unwrap().clone();
        deleted.sort();
        deleted
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn list_events(&self, access_token: &str) -> AppResult<Vec<Event>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(access_token.to_string());
        if self.fail_list {
            return Err(google_calendar_error("HTTP 503"));
        }
        Ok(self.events.clone())
    }

    async fn delete_event(&self, access_token: &str, event_id: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(access_token.to_string());
        if self.failing.contains(event_id) {
            return Err(google_calendar_error("HTTP 404"));
        }
        self.deleted.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}

pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> Event {
    Event::new(id, Some(summary), EventTime::timed(start), EventTime::timed(end))
}

/// Five upcoming events, listed out of start order
pub fn sample_events() -> Vec<Event> {
    vec![
        timed_event("evt-3", "Planning", "2030-01-03T09:00:00Z", "2030-01-03T10:00:00Z"),
        timed_event("evt-1", "Team standup", "2030-01-01T09:00:00Z", "2030-01-01T09:15:00Z"),
        timed_event("evt-5", "Retro", "2030-01-05T14:00:00Z", "2030-01-05T15:00:00Z"),
        timed_event("evt-2", "Lunch with Alex", "2030-01-02T12:00:00Z", "2030-01-02T13:00:00Z"),
        Event::new(
            "evt-4",
            Some("Company holiday"),
            EventTime::all_day("2030-01-04"),
            EventTime::all_day("2030-01-05"),
        ),
    ]
}

pub fn test_config() -> Config {
    Config::new("test-client-id", "test-client-secret", "test-session-secret")
}

/// Router state wired to mocks
pub struct TestApp {
    pub state: AppState,
    pub gateway: Arc<MockCalendarGateway>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn new(gateway: MockCalendarGateway) -> Self {
        Self::with_config(test_config(), gateway)
    }

    pub fn with_config(config: Config, gateway: MockCalendarGateway) -> Self {
        let gateway = Arc::new(gateway);
        let sessions = Arc::new(InMemorySessionStore::new());
        let state = AppState::new(config, sessions.clone(), gateway.clone()).unwrap();

        Self {
            state,
            gateway,
            sessions,
        }
    }

    pub fn router(&self) -> axum::Router {
        calendar_cleanup::web::router(self.state.clone())
    }

    /// Store a signed-in session and return its signed token
    pub async fn sign_in(&self) -> String {
        let session = Session::new(
            SessionToken {
                access_token: ACCESS_TOKEN.to_string(),
                refresh_token: Some("refresh".to_string()),
                expires_at: None,
            },
            Some("user@example.com".to_string()),
            Some("Test User".to_string()),
        );
        self.sessions
            .put_session(&session, self.state.config.session_ttl_seconds())
            .await
            .unwrap();

        self.state.auth_service.generate_token(&session.id).unwrap()
    }

    /// `Cookie` header value for a fresh signed-in session
    pub async fn session_cookie(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.sign_in().await)
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
