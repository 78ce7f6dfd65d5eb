//! HTTP surface: JSON API, sign-in flow and the landing page.

pub mod auth;
pub mod dto;
mod handlers;
mod login;
mod pages;

pub use auth::{AuthService, CurrentSession, MaybeSession, SESSION_COOKIE, STATE_COOKIE};
pub use pages::GatewayEventsApi;

use crate::components::google_calendar::{CalendarGateway, GoogleOAuthClient};
use crate::components::session_store::SessionStore;
use crate::config::Config;
use crate::error::AppResult;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono_tz::Tz;
use dto::ErrorBody;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Signs and verifies session cookies
    pub auth_service: Arc<AuthService>,
    pub sessions: Arc<dyn SessionStore>,
    pub gateway: Arc<dyn CalendarGateway>,
    pub oauth: Arc<GoogleOAuthClient>,
    /// Zone used to display event times
    pub timezone: Tz,
}

impl AppState {
    pub fn new(
        config: Config,
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn CalendarGateway>,
    ) -> AppResult<Self> {
        let timezone = config.display_timezone()?;
        let oauth = GoogleOAuthClient::from_config(&config)?;

        Ok(Self {
            auth_service: Arc::new(AuthService::from_config(&config)),
            config: Arc::new(config),
            sessions,
            gateway,
            oauth: Arc::new(oauth),
            timezone,
        })
    }
}

/// Error response with a JSON `{"error": ...}` body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authenticated")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home_handler).post(pages::home_form_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/events", get(handlers::list_events_handler))
        .route("/api/events/delete", post(handlers::delete_events_handler))
        .route("/api/auth/signin/google", get(login::signin_handler))
        .route("/api/auth/callback/google", get(login::callback_handler))
        .route("/api/auth/signout", post(login::signout_handler))
        .route("/api/auth/session", get(login::session_handler))
        // Serve static files
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
