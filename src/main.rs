use calendar_cleanup::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting Calendar Cleanup");

    // Load configuration
    let config = startup::load_config()?;

    // Wire up sessions, the calendar gateway and OAuth
    let state = startup::build_state(config).await?;

    // Start the web server
    startup::start_server(state).await
}
