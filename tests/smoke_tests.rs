mod common;

use calendar_cleanup::components::session_store::{Session, SessionStore, SessionToken};
use calendar_cleanup::config::Config;
use calendar_cleanup::startup;
use common::test_config;

/// Smoke test to verify that a minimal config is valid
#[tokio::test]
async fn test_config_defaults_validate() {
    let config = test_config();

    assert!(config.validate().is_ok());
    assert_eq!(config.redirect_uri(), "http://localhost:3000/api/auth/callback/google");
    assert_eq!(config.delete_concurrency, 10);
}

/// Without REDIS_URL the service keeps sessions in memory
#[tokio::test]
async fn test_session_store_without_redis() {
    let store = startup::session_store(&test_config()).await;

    let session = Session::new(
        SessionToken {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
        },
        None,
        None,
    );
    store.put_session(&session, 60).await.unwrap();
    assert_eq!(store.get_session(&session.id).await.unwrap(), Some(session));
}

/// An unreachable Redis falls back to memory instead of failing startup
#[tokio::test]
async fn test_unreachable_redis_falls_back() {
    let mut config = Config::new("id", "secret", "session");
    config.redis_url = Some("redis://127.0.0.1:1".to_string());

    let state = startup::build_state(config).await.unwrap();
    assert_eq!(state.config.calendar_id, "primary");
}

