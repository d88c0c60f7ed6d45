use std::error::Error;

use tracing::info;

use crate::infrastructure::bootstrap;
use crate::interfaces::http::start_server;

pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let (config, state) = bootstrap::setup()?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting HTTP server"
    );
    start_server(state, &config.server.host, config.server.port)?.await?;

    Ok(())
}
