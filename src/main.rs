//! roulette-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket matchmaking endpoint.

use roulette_gateway::api;
use roulette_gateway::app_state::AppState;
use roulette_gateway::config::{GatewayConfig, LogFormat};
use roulette_gateway::service::{MatchmakingEngine, spawn_engine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting roulette-gateway");

    // Start the matchmaking engine
    let engine = spawn_engine(
        MatchmakingEngine::new(config.engine_settings()),
        config.engine_command_capacity,
    );

    // Build application state
    let app_state = AppState {
        engine,
        outbound_buffer_capacity: config.outbound_buffer_capacity,
    };

    // Build router
    let app = api::build_app(app_state, &config.cors_allowed_origins)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
