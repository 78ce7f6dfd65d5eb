use crate::components::session_store::SessionToken;
use crate::config::Config;
use crate::error::{oauth_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Token endpoint response for the authorization-code grant
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Subset of the OpenID userinfo response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Client for Google's OAuth 2.0 authorization-code flow
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create an OAuth client from the application config
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| oauth_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.redirect_uri(),
            scopes: config.oauth_scopes.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        })
    }

    /// Build the consent page URL for the given anti-CSRF state
    pub fn authorization_url(&self, state: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| oauth_error(&format!("Invalid authorization URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            // Ask for a refresh token every time
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", state);

        Ok(url)
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> AppResult<SessionToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| oauth_error(&format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(oauth_error(&format!(
                "Failed to exchange code: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| oauth_error(&format!("Failed to parse token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(oauth_error("Token response has an empty access_token"));
        }

        info!("Exchanged authorization code for tokens");

        Ok(SessionToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .map(|expires_in| Utc::now().timestamp() + expires_in),
        })
    }

    /// Fetch the signed-in user's profile; failures only lose the display name
    pub async fn fetch_profile(&self, access_token: &str) -> UserProfile {
        let response = match self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Userinfo request returned HTTP {}", response.status());
                return UserProfile::default();
            }
            Err(e) => {
                warn!("Userinfo request failed: {}", e);
                return UserProfile::default();
            }
        };

        response.json().await.unwrap_or_else(|e| {
            warn!("Failed to parse userinfo response: {}", e);
            UserProfile::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let config = Config::new("client-id", "client-secret", "session");
        let oauth = GoogleOAuthClient::from_config(&config).unwrap();

        let url = oauth.authorization_url("state-123").unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(pairs["client_id"], "client-id");
        assert_eq!(
            pairs["redirect_uri"],
            "http://localhost:3000/api/auth/callback/google"
        );
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["prompt"], "consent");
        assert_eq!(pairs["state"], "state-123");
        assert_eq!(
            pairs["scope"],
            "https://www.googleapis.com/auth/calendar https://www.googleapis.com/auth/calendar.events openid email profile"
        );
    }
}
