use super::models::EventTime;
use chrono::DateTime;
use chrono_tz::Tz;

/// Epoch milliseconds of a timed boundary.
///
/// All-day boundaries (and unparseable `dateTime` values) count as 0, so they
/// sort as if they were at the epoch.
pub fn event_timestamp_millis(time: &EventTime) -> i64 {
    time.date_time
        .as_deref()
        .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// Format a boundary for display in the given timezone
pub fn format_event_time(time: &EventTime, timezone: Tz) -> String {
    if let Some(date_time) = &time.date_time {
        return match DateTime::parse_from_rfc3339(date_time) {
            Ok(dt) => dt.with_timezone(&timezone).format("%Y-%m-%d %H:%M").to_string(),
            // Show whatever Google sent rather than nothing
            Err(_) => date_time.clone(),
        };
    }

    time.date.clone().unwrap_or_default()
}
