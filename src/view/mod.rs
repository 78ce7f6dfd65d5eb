//! Event list view: the in-memory state behind the event table.
//!
//! The view owns the fetched events and applies search, sort and selection
//! on top of them. It talks to the server only through [`EventsApi`], once to
//! load and once per delete.

pub mod client;
pub mod render;
pub mod search;
pub mod selection;
pub mod sort;

pub use client::{EventsApi, HttpEventsApi};
pub use selection::Selection;
pub use sort::{SortDirection, SortField, SortState};

use crate::components::google_calendar::Event;
use tracing::{error, info};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load events. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete events. Please try again.";

/// Lifecycle of one mount of the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    /// Terminal for this mount; there is no automatic retry
    Error(String),
    Ready,
}

/// Toast-style message raised by a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct EventListView {
    status: ViewStatus,
    events: Vec<Event>,
    selection: Selection,
    search_query: String,
    sort: SortState,
    is_deleting: bool,
    notifications: Vec<Notification>,
}

impl Default for EventListView {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListView {
    pub fn new() -> Self {
        Self {
            status: ViewStatus::Loading,
            events: Vec::new(),
            selection: Selection::new(),
            search_query: String::new(),
            sort: SortState::default(),
            is_deleting: false,
            notifications: Vec::new(),
        }
    }

    /// A view that is already loaded with `events`
    pub fn from_events(events: Vec<Event>) -> Self {
        Self {
            status: ViewStatus::Ready,
            events,
            ..Self::new()
        }
    }

    /// Load events; without a signed-in session the view is ready and empty
    pub async fn mount<A: EventsApi + ?Sized>(&mut self, api: &A, authenticated: bool) {
        if !authenticated {
            self.status = ViewStatus::Ready;
            return;
        }

        self.status = ViewStatus::Loading;
        match api.fetch_events().await {
            Ok(events) => {
                info!("Loaded {} events", events.len());
                self.events = events;
                self.status = ViewStatus::Ready;
            }
            Err(e) => {
                error!("Error fetching events: {}", e);
                self.status = ViewStatus::Error(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// All fetched events, unfiltered and in fetch order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Click on a column header
    pub fn sort_by(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Back to an empty query and the default sort
    pub fn reset_filters(&mut self) {
        self.search_query.clear();
        self.sort = SortState::default();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty() || !self.sort.is_default()
    }

    /// Human-readable list of the active filters, `None` when there are none
    pub fn active_filters_description(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.search_query.is_empty() {
            parts.push(format!("Search \"{}\"", self.search_query));
        }
        if !self.sort.is_default() {
            parts.push(format!(
                "Sort by {} ({})",
                self.sort.field.as_str(),
                self.sort.direction.describe()
            ));
        }

        if parts.is_empty() {
            None
        } else {
            Some(format!("Active filters: {}", parts.join(" ")))
        }
    }

    /// Events matching the search query, in sort order
    pub fn visible_events(&self) -> Vec<&Event> {
        let mut visible = search::filter_events(&self.events, &self.search_query);
        self.sort.sort(&mut visible);
        visible
    }

    fn visible_ids(&self) -> Vec<&str> {
        self.visible_events()
            .into_iter()
            .map(|event| event.id.as_str())
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, event_id: &str) -> bool {
        self.selection.contains(event_id)
    }

    /// Toggle one row's checkbox
    pub fn toggle_event(&mut self, event_id: &str) {
        self.selection.toggle(event_id);
    }

    /// Replace the selection with `ids`, ignoring ids that are not loaded
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Selection::from_ids(ids);
        selection.retain(|id| self.events.iter().any(|event| event.id == id));
        self.selection = selection;
    }

    /// The "select all" checkbox, relative to the visible events
    pub fn select_all(&mut self) {
        let visible: Vec<String> = self.visible_ids().into_iter().map(String::from).collect();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.select_all(&visible);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    pub fn select_all_label(&self) -> &'static str {
        if self.is_all_selected() {
            "Deselect All"
        } else {
            "Select All"
        }
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting
    }

    /// Delete the selected events.
    ///
    /// On any successful response every selected event leaves the list, even
    /// ones the server reports as failed. On failure nothing changes.
    pub async fn delete_selected<A: EventsApi + ?Sized>(&mut self, api: &A) {
        if self.selection.is_empty() {
            return;
        }

        self.is_deleting = true;
        let event_ids = self.selection.ids().to_vec();

        match api.delete_events(&event_ids).await {
            Ok(summary) => {
                let selection = &self.selection;
                self.events.retain(|event| !selection.contains(&event.id));
                self.selection.clear();
                self.notifications.push(Notification::Success(summary.message));
            }
            Err(e) => {
                error!("Error deleting events: {}", e);
                self.notifications
                    .push(Notification::Error(DELETE_FAILED_MESSAGE.to_string()));
            }
        }

        self.is_deleting = false;
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand pending notifications to the caller
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::{DeleteSummary, EventTime};
    use crate::error::{transport_error, AppResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubApi {
        events: AppResult<Vec<Event>>,
        delete_fails: bool,
        deleted: Mutex<Vec<Vec<String>>>,
    }

    impl StubApi {
        fn with_events(events: Vec<Event>) -> Self {
            Self {
                events: Ok(events),
                delete_fails: false,
                deleted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EventsApi for StubApi {
        async fn fetch_events(&self) -> AppResult<Vec<Event>> {
            match &self.events {
                Ok(events) => Ok(events.clone()),
                Err(_) => Err(transport_error("boom")),
            }
        }

        async fn delete_events(&self, event_ids: &[String]) -> AppResult<DeleteSummary> {
            self.deleted.lock().unwrap().push(event_ids.to_vec());
            if self.delete_fails {
                return Err(transport_error("network down"));
            }
            Ok(DeleteSummary::new(event_ids.len(), 0))
        }
    }

    fn event(id: &str, summary: &str, start: &str) -> Event {
        Event::new(id, Some(summary), EventTime::timed(start), EventTime::timed(start))
    }

    fn sample_events() -> Vec<Event> {
        vec![
            event("1", "Team Standup", "2024-05-02T09:00:00Z"),
            event("2", "Lunch", "2024-05-01T12:00:00Z"),
            event("3", "Standup retro", "2024-05-03T15:00:00Z"),
        ]
    }

    async fn mounted() -> (EventListView, StubApi) {
        let api = StubApi::with_events(sample_events());
        let mut view = EventListView::new();
        view.mount(&api, true).await;
        (view, api)
    }

    fn visible_ids(view: &EventListView) -> Vec<&str> {
        view.visible_events().iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_mount_unauthenticated_skips_fetch() {
        let api = StubApi {
            events: Err(transport_error("should not be called")),
            delete_fails: false,
            deleted: Mutex::new(Vec::new()),
        };
        let mut view = EventListView::new();
        assert_eq!(view.status(), &ViewStatus::Loading);

        view.mount(&api, false).await;
        assert_eq!(view.status(), &ViewStatus::Ready);
        assert!(view.events().is_empty());
    }

    #[tokio::test]
    async fn test_mount_failure_sets_error() {
        let api = StubApi {
            events: Err(transport_error("boom")),
            delete_fails: false,
            deleted: Mutex::new(Vec::new()),
        };
        let mut view = EventListView::new();
        view.mount(&api, true).await;

        assert_eq!(view.status(), &ViewStatus::Error(LOAD_FAILED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_visible_events_default_sort_is_start_ascending() {
        let (view, _) = mounted().await;
        assert_eq!(view.status(), &ViewStatus::Ready);
        assert_eq!(visible_ids(&view), vec!["2", "1", "3"]);
        assert!(!view.has_active_filters());
        assert_eq!(view.active_filters_description(), None);
    }

    #[tokio::test]
    async fn test_search_then_sort() {
        let (mut view, _) = mounted().await;
        view.set_search_query("standup");
        view.sort_by(SortField::Start);

        assert_eq!(visible_ids(&view), vec!["3", "1"]);
        assert!(view.has_active_filters());
        assert_eq!(
            view.active_filters_description().as_deref(),
            Some("Active filters: Search \"standup\" Sort by start (descending)")
        );

        view.reset_filters();
        assert!(!view.has_active_filters());
        assert_eq!(visible_ids(&view), vec!["2", "1", "3"]);
    }

    #[tokio::test]
    async fn test_select_all_uses_visible_events() {
        let (mut view, _) = mounted().await;
        view.toggle_event("2");
        view.set_search_query("standup");

        assert_eq!(view.select_all_label(), "Select All");
        view.select_all();
        assert_eq!(view.selection().ids(), ["1", "3"]);
        assert!(view.is_all_selected());
        assert_eq!(view.select_all_label(), "Deselect All");

        view.select_all();
        assert!(view.selection().is_empty());
    }

    #[tokio::test]
    async fn test_set_selection_ignores_unknown_ids() {
        let (mut view, _) = mounted().await;
        view.set_selection(["3", "missing", "1"]);
        assert_eq!(view.selection().ids(), ["3", "1"]);
    }

    #[tokio::test]
    async fn test_delete_selected_removes_events() {
        let (mut view, api) = mounted().await;
        view.toggle_event("1");
        view.toggle_event("3");

        view.delete_selected(&api).await;

        assert_eq!(visible_ids(&view), vec!["2"]);
        assert!(view.selection().is_empty());
        assert!(!view.is_deleting());
        assert_eq!(
            view.take_notifications(),
            vec![Notification::Success(
                "Deleted 2 events, failed to delete 0 events".to_string()
            )]
        );
        assert!(view.notifications().is_empty());
        assert_eq!(
            *api.deleted.lock().unwrap(),
            vec![vec!["1".to_string(), "3".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_state() {
        let (mut view, mut api) = mounted().await;
        api.delete_fails = true;
        view.toggle_event("2");

        view.delete_selected(&api).await;

        assert_eq!(view.events().len(), 3);
        assert_eq!(view.selection().ids(), ["2"]);
        assert!(!view.is_deleting());
        assert_eq!(
            view.notifications(),
            [Notification::Error(DELETE_FAILED_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_with_empty_selection_is_noop() {
        let (mut view, api) = mounted().await;
        view.delete_selected(&api).await;

        assert!(api.deleted.lock().unwrap().is_empty());
        assert!(view.notifications().is_empty());
        assert_eq!(view.events().len(), 3);
    }
}
