use super::{ApiError, AppState};
use crate::components::session_store::Session;
use crate::config::Config;
use crate::error::{other_error, AppResult, Error};
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Cookie holding the signed session token
pub const SESSION_COOKIE: &str = "session_token";
/// Cookie holding the OAuth anti-CSRF state during sign-in
pub const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_MINUTES: i64 = 10;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Session id in the session store
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// Signs and verifies session tokens
pub struct AuthService {
    secret: String,
    ttl_minutes: i64,
}

impl AuthService {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session_secret.clone(), config.session_ttl_minutes)
    }

    /// Generate a token pointing at `session_id`
    pub fn generate_token(&self, session_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: session_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| other_error(&format!("Failed to generate token: {}", e)))
    }

    /// Validate a token, rejecting bad signatures and expired tokens
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| {
            debug!("Session token rejected: {:?}", e);
            Error::Unauthenticated
        })
    }

    /// Session cookie carrying `token`, living as long as the session
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::minutes(self.ttl_minutes))
            .build()
    }
}

/// Short-lived cookie carrying the OAuth state
pub fn state_cookie(state: String) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(STATE_COOKIE_MINUTES))
        .build()
}

/// Cookie that makes the browser forget `name`
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Find the session token in the cookie, falling back to a bearer header
pub fn extract_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let auth_header = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve the request's session, if it has a valid one
async fn resolve_session(parts: &Parts, state: &AppState) -> Option<Session> {
    let token = extract_token(parts)?;
    let claims = state.auth_service.validate_token(&token).ok()?;

    match state.sessions.get_session(&claims.sub).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load session: {}", e);
            None
        }
    }
}

/// A signed-in session with a usable access token; 401 otherwise
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// The session if there is one; never rejects
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, state).await {
            Some(session) if session.is_authenticated() => Ok(CurrentSession(session)),
            _ => Err(ApiError::unauthorized()),
        }
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(resolve_session(parts, state).await))
    }
}
