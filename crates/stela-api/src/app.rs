//! Server entry — binds the listener and runs the router.

use tokio::net::TcpListener;

use stela_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Bind the configured address and serve the API until shutdown.
pub async fn serve(state: AppState) -> Result<(), AppError> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "HTTP server listening");

    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Resolves when the process receives a termination signal.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
