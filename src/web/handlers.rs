use super::auth::CurrentSession;
use super::dto::{DeleteEventsRequest, EventsResponse};
use super::{ApiError, AppState};
use crate::components::google_calendar::{delete_events, DeleteSummary};
use axum::{body::Bytes, extract::State, Json};
use tracing::{error, info};

/// Handler for the upcoming events list
pub async fn list_events_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<EventsResponse>, ApiError> {
    match state.gateway.list_events(&session.token.access_token).await {
        Ok(events) => Ok(Json(EventsResponse { events })),
        Err(e) => {
            error!("Error fetching events: {}", e);
            Err(ApiError::internal("Failed to fetch events"))
        }
    }
}

/// Handler for batch deletes.
///
/// The session is checked before the body is looked at, so unauthenticated
/// requests never reach body validation or the calendar.
pub async fn delete_events_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Bytes,
) -> Result<Json<DeleteSummary>, ApiError> {
    let Some(event_ids) = DeleteEventsRequest::parse(&body) else {
        return Err(ApiError::bad_request("No event IDs provided"));
    };

    info!("Deleting {} events", event_ids.len());
    let summary = delete_events(
        state.gateway.as_ref(),
        &session.token.access_token,
        &event_ids,
        state.config.delete_concurrency,
    )
    .await;

    Ok(Json(summary))
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
