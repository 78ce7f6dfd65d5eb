use crate::components::google_calendar::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /api/events` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// `POST /api/events/delete` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventsRequest {
    #[serde(default)]
    pub event_ids: Option<Vec<String>>,
}

impl DeleteEventsRequest {
    /// The requested ids, `None` when the body is unusable or the list is empty
    pub fn parse(body: &[u8]) -> Option<Vec<String>> {
        let request: DeleteEventsRequest = serde_json::from_slice(body).ok()?;
        request.event_ids.filter(|ids| !ids.is_empty())
    }
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /api/auth/session` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub email: Option<String>,
    pub name: Option<String>,
    /// When the browser session ends
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_request() {
        assert_eq!(
            DeleteEventsRequest::parse(br#"{"eventIds":["a","b"]}"#),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(DeleteEventsRequest::parse(br#"{"eventIds":[]}"#), None);
        assert_eq!(DeleteEventsRequest::parse(br#"{}"#), None);
        assert_eq!(DeleteEventsRequest::parse(br#"{"eventIds":"a"}"#), None);
        assert_eq!(DeleteEventsRequest::parse(b"not json"), None);
        assert_eq!(DeleteEventsRequest::parse(b""), None);
    }
}
