use super::auth::{removal_cookie, state_cookie, MaybeSession, SESSION_COOKIE, STATE_COOKIE};
use super::dto::SessionResponse;
use super::{ApiError, AppState};
use crate::components::session_store::Session;
use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Error codes the sign-in flow may put in the landing page URL, with the
/// message shown for each
const ALLOWED_ERROR_MESSAGES: [(&str, &str); 4] = [
    ("access_denied", "Sign-in was cancelled."),
    ("state_mismatch", "Sign-in expired. Please try again."),
    ("signin_failed", "Sign-in with Google failed. Please try again."),
    ("session_failed", "Could not start your session. Please try again."),
];

/// Message for a landing page `error` code; unknown codes show nothing
pub fn error_message(code: &str) -> Option<&'static str> {
    ALLOWED_ERROR_MESSAGES
        .iter()
        .find(|(allowed, _)| *allowed == code)
        .map(|(_, message)| *message)
}

fn error_redirect(code: &str) -> Redirect {
    Redirect::to(&format!("/?error={}", code))
}

/// Start the Google sign-in flow
pub async fn signin_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let csrf_state = uuid::Uuid::new_v4().to_string();

    let url = state.oauth.authorization_url(&csrf_state).map_err(|e| {
        error!("Failed to build authorization URL: {}", e);
        ApiError::internal("Failed to start sign-in")
    })?;

    Ok((jar.add(state_cookie(csrf_state)), Redirect::to(url.as_str())))
}

/// Query parameters Google sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Finish sign-in: check state, exchange the code and start a session
pub async fn callback_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let expected_state = jar.get(STATE_COOKIE).map(|cookie| cookie.value().to_string());
    let jar = jar.remove(removal_cookie(STATE_COOKIE));

    if let Some(reason) = params.error {
        warn!("Google sign-in returned an error: {}", reason);
        return (jar, error_redirect("access_denied"));
    }

    match (params.state.as_deref(), expected_state.as_deref()) {
        (Some(received), Some(expected)) if received == expected => {}
        _ => {
            warn!("OAuth state mismatch on callback");
            return (jar, error_redirect("state_mismatch"));
        }
    }

    let Some(code) = params.code else {
        warn!("OAuth callback without a code");
        return (jar, error_redirect("signin_failed"));
    };

    let token = match state.oauth.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to exchange authorization code: {}", e);
            return (jar, error_redirect("signin_failed"));
        }
    };

    let profile = state.oauth.fetch_profile(&token.access_token).await;
    let session = Session::new(token, profile.email, profile.name);

    if let Err(e) = state
        .sessions
        .put_session(&session, state.config.session_ttl_seconds())
        .await
    {
        error!("Failed to store session: {}", e);
        return (jar, error_redirect("session_failed"));
    }

    let session_token = match state.auth_service.generate_token(&session.id) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to sign session token: {}", e);
            return (jar, error_redirect("session_failed"));
        }
    };

    info!(
        "User {} signed in",
        session.email.as_deref().unwrap_or("<unknown>")
    );
    let jar = jar.add(state.auth_service.session_cookie(session_token));
    (jar, Redirect::to("/"))
}

/// Sign out: forget the session and clear the cookie
pub async fn signout_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(session) = session {
        match state.sessions.delete_session(&session.id).await {
            Ok(()) => info!(
                "User {} signed out",
                session.email.as_deref().unwrap_or("<unknown>")
            ),
            Err(e) => error!("Failed to delete session: {}", e),
        }
    }

    (jar.remove(removal_cookie(SESSION_COOKIE)), Redirect::to("/"))
}

/// Describe the current session
pub async fn session_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<SessionResponse> {
    let response = match session {
        Some(session) => SessionResponse {
            authenticated: session.is_authenticated(),
            expires_at: Some(
                session.created_at + Duration::minutes(state.config.session_ttl_minutes),
            ),
            email: session.email,
            name: session.name,
        },
        None => SessionResponse::default(),
    };

    Json(response)
}
