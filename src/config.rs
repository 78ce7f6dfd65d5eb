use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Default location of the optional TOML overrides file
pub const DEFAULT_CONFIG_FILE: &str = "config/calendar_cleanup.toml";

/// Google endpoints
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at sign-in
pub const DEFAULT_SCOPES: [&str; 5] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
    "openid",
    "email",
    "profile",
];

/// Main configuration structure for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Secret used to sign session cookies
    pub session_secret: String,
    /// Externally visible base URL, used to build the OAuth redirect URI
    pub public_url: String,
    /// Address to bind the HTTP listener to
    pub bind_address: String,
    /// Port to listen on
    pub port: u16,
    /// Redis connection URL; sessions are kept in memory when unset
    pub redis_url: Option<String>,
    /// Calendar whose events are listed and deleted
    pub calendar_id: String,
    /// Maximum number of delete calls in flight for one batch
    pub delete_concurrency: usize,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
    /// Timeout for outbound HTTP calls, in seconds
    pub http_timeout_secs: u64,
    /// How long a session lives, in minutes
    pub session_ttl_minutes: i64,
    /// Timezone used to display event times
    pub timezone: String,
    /// OAuth scopes requested at sign-in
    pub oauth_scopes: Vec<String>,
    pub calendar_api_base: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// Optional overrides read from the TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    public_url: Option<String>,
    bind_address: Option<String>,
    port: Option<u16>,
    redis_url: Option<String>,
    calendar_id: Option<String>,
    delete_concurrency: Option<usize>,
    max_body_bytes: Option<usize>,
    http_timeout_secs: Option<u64>,
    session_ttl_minutes: Option<i64>,
    timezone: Option<String>,
    oauth_scopes: Option<Vec<String>>,
}

impl Config {
    /// Create a configuration with the given credentials and defaults for everything else
    pub fn new(
        google_client_id: impl Into<String>,
        google_client_secret: impl Into<String>,
        session_secret: impl Into<String>,
    ) -> Self {
        Self {
            google_client_id: google_client_id.into(),
            google_client_secret: google_client_secret.into(),
            session_secret: session_secret.into(),
            public_url: "http://localhost:3000".to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            redis_url: None,
            calendar_id: "primary".to_string(),
            delete_concurrency: 10,
            max_body_bytes: 16 * 1024 * 1024, // 16MB
            http_timeout_secs: 30,
            session_ttl_minutes: 60 * 24 * 30, // 30 days
            timezone: "UTC".to_string(),
            oauth_scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            calendar_api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| env_error("SESSION_SECRET"))?;

        let mut config = Self::new(google_client_id, google_client_secret, session_secret);

        if let Ok(public_url) = env::var("PUBLIC_URL") {
            config.public_url = public_url;
        }
        if let Ok(bind_address) = env::var("BIND_ADDRESS") {
            config.bind_address = bind_address;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?;
        }
        config.redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        if let Ok(calendar_id) = env::var("GOOGLE_CALENDAR_ID") {
            config.calendar_id = calendar_id;
        }
        if let Ok(concurrency) = env::var("DELETE_CONCURRENCY") {
            config.delete_concurrency = concurrency
                .parse::<usize>()
                .map_err(|_| config_error("Invalid DELETE_CONCURRENCY format"))?;
        }
        if let Ok(limit) = env::var("MAX_BODY_BYTES") {
            config.max_body_bytes = limit
                .parse::<usize>()
                .map_err(|_| config_error("Invalid MAX_BODY_BYTES format"))?;
        }
        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = timeout
                .parse::<u64>()
                .map_err(|_| config_error("Invalid HTTP_TIMEOUT_SECS format"))?;
        }
        if let Ok(ttl) = env::var("SESSION_TTL_MINUTES") {
            config.session_ttl_minutes = ttl
                .parse::<i64>()
                .map_err(|_| config_error("Invalid SESSION_TTL_MINUTES format"))?;
        }
        if let Ok(timezone) = env::var("TIMEZONE") {
            config.timezone = timezone;
        }
        if let Ok(base) = env::var("GOOGLE_CALENDAR_API_BASE") {
            config.calendar_api_base = base;
        }
        if let Ok(url) = env::var("GOOGLE_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = env::var("GOOGLE_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(url) = env::var("GOOGLE_USERINFO_URL") {
            config.userinfo_url = url;
        }

        // Load overrides from file if it exists
        let config_file =
            env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if Path::new(&config_file).exists() {
            let content = fs::read_to_string(&config_file)?;
            config.apply_overrides(&content)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Merge TOML overrides into this configuration
    pub fn apply_overrides(&mut self, content: &str) -> AppResult<()> {
        let overrides: FileOverrides = toml::from_str(content)?;

        if let Some(public_url) = overrides.public_url {
            self.public_url = public_url;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if overrides.redis_url.is_some() {
            self.redis_url = overrides.redis_url;
        }
        if let Some(calendar_id) = overrides.calendar_id {
            self.calendar_id = calendar_id;
        }
        if let Some(concurrency) = overrides.delete_concurrency {
            self.delete_concurrency = concurrency;
        }
        if let Some(limit) = overrides.max_body_bytes {
            self.max_body_bytes = limit;
        }
        if let Some(timeout) = overrides.http_timeout_secs {
            self.http_timeout_secs = timeout;
        }
        if let Some(ttl) = overrides.session_ttl_minutes {
            self.session_ttl_minutes = ttl;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = timezone;
        }
        if let Some(scopes) = overrides.oauth_scopes {
            self.oauth_scopes = scopes;
        }

        Ok(())
    }

    /// Check values that cannot be expressed by the types alone
    pub fn validate(&self) -> AppResult<()> {
        if self.delete_concurrency == 0 {
            return Err(config_error("DELETE_CONCURRENCY must be at least 1"));
        }
        if self.max_body_bytes == 0 {
            return Err(config_error("MAX_BODY_BYTES must be positive"));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(config_error("SESSION_TTL_MINUTES must be positive"));
        }
        if self.session_secret.is_empty() {
            return Err(config_error("SESSION_SECRET must not be empty"));
        }
        self.display_timezone()?;
        Ok(())
    }

    /// Parsed display timezone
    pub fn display_timezone(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }

    /// OAuth redirect URI registered with Google
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/callback/google",
            self.public_url.trim_end_matches('/')
        )
    }

    /// Session lifetime in seconds
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("id", "secret", "session");
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.delete_concurrency, 10);
        assert_eq!(config.max_body_bytes, 16 * 1024 * 1024);
        assert_eq!(config.oauth_scopes.len(), 5);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:3000/api/auth/callback/google"
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::new("id", "secret", "session");
        config
            .apply_overrides(
                r#"
                public_url = "https://cleanup.example.com/"
                port = 8080
                delete_concurrency = 4
                max_body_bytes = 2048
                timezone = "Europe/Helsinki"
                "#,
            )
            .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.delete_concurrency, 4);
        assert_eq!(config.max_body_bytes, 2048);
        assert_eq!(config.display_timezone().unwrap(), chrono_tz::Europe::Helsinki);
        // Trailing slash is not doubled
        assert_eq!(
            config.redirect_uri(),
            "https://cleanup.example.com/api/auth/callback/google"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::new("id", "secret", "session");
        config.delete_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new("id", "secret", "session");
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());

        let config = Config::new("id", "secret", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = Config::new("id", "secret", "session");
        assert!(config.apply_overrides("port = \"not a number\"").is_err());
    }
}
