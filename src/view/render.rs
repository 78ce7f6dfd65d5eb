use super::sort::{SortField, SortState};
use super::{EventListView, Notification, ViewStatus};
use crate::components::google_calendar::time::format_event_time;
use crate::error::AppResult;
use askama::Template;
use chrono_tz::Tz;

/// One table row
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub selected: bool,
}

/// A sortable column header linking to its toggled sort
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub label: &'static str,
    pub indicator: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationView {
    /// CSS modifier: `success` or `error`
    pub kind: &'static str,
    pub message: String,
}

/// Everything the template needs to draw the event list
#[derive(Debug, Clone)]
pub struct EventListPage {
    pub loading: bool,
    pub error: Option<String>,
    pub has_events: bool,
    pub rows: Vec<EventRow>,
    pub columns: Vec<ColumnHeader>,
    pub search_query: String,
    pub sort_field: &'static str,
    pub sort_direction: &'static str,
    pub has_active_filters: bool,
    pub active_filters: Option<String>,
    /// Link that drops the search but keeps the sort
    pub clear_search_href: String,
    pub all_selected: bool,
    pub select_all_label: &'static str,
    pub selected_count: usize,
    pub is_deleting: bool,
    pub notifications: Vec<NotificationView>,
}

impl EventListPage {
    /// Snapshot the view for rendering, with times shown in `timezone`
    pub fn from_view(view: &EventListView, timezone: Tz) -> Self {
        let sort = view.sort_state();
        let query = view.search_query();

        let rows = view
            .visible_events()
            .into_iter()
            .map(|event| EventRow {
                id: event.id.clone(),
                title: event.display_title().to_string(),
                start: format_event_time(&event.start, timezone),
                end: format_event_time(&event.end, timezone),
                selected: view.is_selected(&event.id),
            })
            .collect();

        let columns = SortField::ALL
            .iter()
            .map(|field| ColumnHeader {
                label: field.label(),
                indicator: sort.indicator(*field),
                href: list_href(query, sort.toggled(*field)),
            })
            .collect();

        let notifications = view
            .notifications()
            .iter()
            .map(|notification| match notification {
                Notification::Success(message) => NotificationView {
                    kind: "success",
                    message: message.clone(),
                },
                Notification::Error(message) => NotificationView {
                    kind: "error",
                    message: message.clone(),
                },
            })
            .collect();

        let error = match view.status() {
            ViewStatus::Error(message) => Some(message.clone()),
            _ => None,
        };

        Self {
            loading: *view.status() == ViewStatus::Loading,
            error,
            has_events: !view.events().is_empty(),
            rows,
            columns,
            search_query: query.to_string(),
            sort_field: sort.field.as_str(),
            sort_direction: sort.direction.as_str(),
            has_active_filters: view.has_active_filters(),
            active_filters: view.active_filters_description(),
            clear_search_href: list_href("", sort),
            all_selected: view.is_all_selected(),
            select_all_label: view.select_all_label(),
            selected_count: view.selection().len(),
            is_deleting: view.is_deleting(),
            notifications,
        }
    }
}

/// Link to the landing page with the given search and sort
pub fn list_href(query: &str, sort: SortState) -> String {
    let mut href = format!(
        "/?sort={}&dir={}",
        sort.field.as_str(),
        sort.direction.as_str()
    );
    if !query.is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(query));
    }
    href
}

/// Landing page
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub signed_in: bool,
    pub user_label: Option<String>,
    pub error_message: Option<&'static str>,
    pub list: Option<EventListPage>,
}

impl HomePage {
    pub fn signed_out(error_message: Option<&'static str>) -> Self {
        Self {
            signed_in: false,
            user_label: None,
            error_message,
            list: None,
        }
    }

    pub fn signed_in(user_label: Option<String>, list: EventListPage) -> Self {
        Self {
            signed_in: true,
            user_label,
            error_message: None,
            list: Some(list),
        }
    }

    pub fn to_html(&self) -> AppResult<String> {
        Ok(self.render()?)
    }
}
