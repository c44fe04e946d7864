//! HTTP server.

pub mod router;
pub mod types;

pub use router::create_router_with_state;
pub use types::ServerState;

use std::net::SocketAddr;

/// Serve the API on `bind` until Ctrl-C.
pub async fn run(bind: SocketAddr, state: ServerState) -> anyhow::Result<()> {
    let app = create_router_with_state(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %bind, "BuildLink API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
