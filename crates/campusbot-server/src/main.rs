//! campusbot-server - HTTP API server binary.

use std::net::SocketAddr;

use campusbot_core::BotConfig;
use campusbot_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("campusbot_server=debug".parse().unwrap()),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("CAMPUSBOT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("CAMPUSBOT_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("CAMPUSBOT_PORT must be a valid port number");

    // Wire up stores, dispatcher, and scheduler
    let config = BotConfig::from_env();
    let state = AppState::from_config(config)?;

    // Start the reminder loop before accepting traffic
    state.scheduler.start();
    info!("Reminder scheduler started");

    let app = create_server(state.clone());

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting campusbot-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping scheduler...");
        })
        .await?;

    state.scheduler.stop();
    info!("Server stopped cleanly");
    Ok(())
}
