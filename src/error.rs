use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Not authenticated")]
    #[diagnostic(code(calendar_cleanup::unauthenticated))]
    Unauthenticated,

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calendar_cleanup::google_calendar))]
    GoogleCalendar(String),

    #[error("OAuth error: {0}")]
    #[diagnostic(code(calendar_cleanup::oauth))]
    OAuth(String),

    #[error("Session store error: {0}")]
    #[diagnostic(code(calendar_cleanup::session_store))]
    SessionStore(String),

    #[error("Transport error: {0}")]
    #[diagnostic(code(calendar_cleanup::transport))]
    Transport(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calendar_cleanup::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_cleanup::config))]
    Config(String),

    #[error("Template error: {0}")]
    #[diagnostic(code(calendar_cleanup::template))]
    Template(String),

    #[error(transparent)]
    #[diagnostic(code(calendar_cleanup::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendar_cleanup::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendar_cleanup::other))]
    Other(String),
}

// TOML config overrides
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        Error::Template(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create OAuth errors
pub fn oauth_error(message: &str) -> Error {
    Error::OAuth(message.to_string())
}

/// Helper to create session store errors
pub fn session_store_error(message: &str) -> Error {
    Error::SessionStore(message.to_string())
}

/// Helper to create transport errors
pub fn transport_error(message: &str) -> Error {
    Error::Transport(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
