use crate::components::google_calendar::GoogleCalendarGateway;
use crate::components::session_store::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use crate::web::{self, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Pick a session store: Redis when configured and reachable, memory otherwise
pub async fn session_store(config: &Config) -> Arc<dyn SessionStore> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        info!("REDIS_URL not set, keeping sessions in memory");
        return Arc::new(InMemorySessionStore::new());
    };

    match RedisSessionStore::connect(redis_url).await {
        Ok(store) => {
            info!("Connected to Redis successfully");
            Arc::new(store)
        }
        Err(e) => {
            // Log the error and fall back to memory
            error!("Failed to connect to Redis: {}", e);
            warn!("Using in-memory session store as fallback; sessions end on restart");
            Arc::new(InMemorySessionStore::new())
        }
    }
}

/// Build the shared handler state from the config
pub async fn build_state(config: Config) -> miette::Result<AppState> {
    let sessions = session_store(&config).await;
    let gateway = Arc::new(GoogleCalendarGateway::from_config(&config)?);

    info!(
        "Using calendar {} with delete concurrency {}",
        config.calendar_id, config.delete_concurrency
    );

    Ok(AppState::new(config, sessions, gateway)?)
}

/// Bind the listener and serve until a shutdown signal arrives
pub async fn start_server(state: AppState) -> miette::Result<()> {
    let addr = format!("{}:{}", state.config.bind_address, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Web server stopped");
    Ok(())
}
