use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder shown for events without a title
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// One side of an event's time range, exactly as Google returns it.
///
/// Timed events carry `dateTime` (RFC 3339 with offset); all-day events carry
/// `date` (`YYYY-MM-DD`) only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// A timed boundary
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            ..Default::default()
        }
    }

    /// An all-day boundary
    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Default::default()
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.date_time.is_none() && self.date.is_some()
    }
}

/// Calendar event as returned by the Google Calendar API.
///
/// Only the fields the service looks at are typed; everything else is kept
/// in `extra` so events pass through the API untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Create an event with the given boundaries
    pub fn new(
        id: impl Into<String>,
        summary: Option<&str>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.map(str::to_string),
            start,
            end,
            extra: Map::new(),
        }
    }

    /// Title for display, falling back to a placeholder
    pub fn display_title(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => UNTITLED_EVENT,
        }
    }

    /// Lowercased title used for searching and sorting
    pub fn normalized_title(&self) -> String {
        self.summary.as_deref().unwrap_or("").to_lowercase()
    }
}
