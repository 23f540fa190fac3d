use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use mediacat::{MergeConfig, MergeOrchestrator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediacat_server::config::ServerConfig;
use mediacat_server::router::build_app_router;
use mediacat_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediacat=info,mediacat_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::parse();
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    if !mediacat::media::tools::ffmpeg_available().await {
        tracing::warn!("ffmpeg not found on PATH; audio and video merges will fail");
    }

    // --- App state ---
    let orchestrator =
        MergeOrchestrator::new(MergeConfig::default()).context("Invalid merge configuration")?;
    let state = AppState::new(orchestrator);

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
