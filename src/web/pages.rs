use super::auth::MaybeSession;
use super::login::error_message;
use super::{ApiError, AppState};
use crate::components::google_calendar::{delete_events, CalendarGateway, DeleteSummary, Event};
use crate::components::session_store::Session;
use crate::error::AppResult;
use crate::view::render::{EventListPage, HomePage};
use crate::view::{EventListView, EventsApi, SortDirection, SortField, SortState};
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

/// `EventsApi` that calls the calendar directly, for pages rendered in-process
pub struct GatewayEventsApi {
    gateway: Arc<dyn CalendarGateway>,
    access_token: String,
    concurrency: usize,
}

impl GatewayEventsApi {
    pub fn new(gateway: Arc<dyn CalendarGateway>, access_token: String, concurrency: usize) -> Self {
        Self {
            gateway,
            access_token,
            concurrency,
        }
    }

    fn for_session(state: &AppState, session: Option<&Session>) -> Self {
        Self::new(
            state.gateway.clone(),
            session
                .map(|session| session.token.access_token.clone())
                .unwrap_or_default(),
            state.config.delete_concurrency,
        )
    }
}

#[async_trait]
impl EventsApi for GatewayEventsApi {
    async fn fetch_events(&self) -> AppResult<Vec<Event>> {
        self.gateway.list_events(&self.access_token).await
    }

    async fn delete_events(&self, event_ids: &[String]) -> AppResult<DeleteSummary> {
        Ok(delete_events(
            self.gateway.as_ref(),
            &self.access_token,
            event_ids,
            self.concurrency,
        )
        .await)
    }
}

/// Search and sort carried in the landing page URL
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub error: Option<String>,
}

/// Landing page form post
#[derive(Debug, Default, Deserialize)]
pub struct HomeForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub ids: Vec<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

fn sort_from_params(sort: Option<&str>, dir: Option<&str>) -> SortState {
    SortState::new(
        sort.and_then(SortField::parse).unwrap_or_default(),
        dir.and_then(SortDirection::parse).unwrap_or_default(),
    )
}

fn user_label(session: &Session) -> Option<String> {
    session.email.clone().or_else(|| session.name.clone())
}

/// Mount a view for this request with the given search and sort
async fn load_view(
    state: &AppState,
    session: Option<&Session>,
    query: Option<String>,
    sort: SortState,
) -> (EventListView, GatewayEventsApi) {
    let api = GatewayEventsApi::for_session(state, session);
    let authenticated = session.is_some_and(Session::is_authenticated);

    let mut view = EventListView::new();
    view.mount(&api, authenticated).await;
    view.set_search_query(query.unwrap_or_default());
    view.set_sort(sort);

    (view, api)
}

fn render(page: HomePage) -> Result<Html<String>, ApiError> {
    page.to_html().map(Html).map_err(|e| {
        error!("Failed to render landing page: {}", e);
        ApiError::internal("Failed to render page")
    })
}

/// Handler for the landing page
pub async fn home_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, ApiError> {
    let Some(session) = session else {
        let message = query.error.as_deref().and_then(error_message);
        return render(HomePage::signed_out(message));
    };

    let sort = sort_from_params(query.sort.as_deref(), query.dir.as_deref());
    let (view, _) = load_view(&state, Some(&session), query.q, sort).await;

    render(HomePage::signed_in(
        user_label(&session),
        EventListPage::from_view(&view, state.timezone),
    ))
}

/// Handler for the landing page's select-all and delete buttons
pub async fn home_form_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Form(form): Form<HomeForm>,
) -> Result<Html<String>, ApiError> {
    let Some(session) = session else {
        return render(HomePage::signed_out(None));
    };

    let sort = sort_from_params(form.sort.as_deref(), form.dir.as_deref());
    let (mut view, api) = load_view(&state, Some(&session), form.q, sort).await;
    view.set_selection(form.ids);

    match form.action.as_str() {
        "delete" => view.delete_selected(&api).await,
        "select_all" => view.select_all(),
        _ => {}
    }

    render(HomePage::signed_in(
        user_label(&session),
        EventListPage::from_view(&view, state.timezone),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_from_params_falls_back_to_default() {
        assert_eq!(sort_from_params(None, None), SortState::default());
        assert_eq!(
            sort_from_params(Some("end"), Some("desc")),
            SortState::new(SortField::End, SortDirection::Descending)
        );
        assert_eq!(
            sort_from_params(Some("bogus"), Some("sideways")),
            SortState::default()
        );
    }
}
