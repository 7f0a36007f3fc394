use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use price_gateway::{
    api,
    config::{AppEnv, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let default_filter = match config.app_env {
        AppEnv::Development => "info,price_gateway=debug,tower_http=debug",
        AppEnv::Production | AppEnv::Test => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    info!(?config, "Configuration loaded");

    // Build our application with routes
    let app = api::router::create_router(&config)?;

    // Run our application
    let addr = SocketAddr::from((config.host, config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
