//! Application startup and server initialization.
//!
//! Builds the client from configuration, starts it, and serves the local
//! HTTP surface until the process is stopped.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::App;
use crate::config::ConfigV1;
use crate::error::Error;
use crate::routes;
use crate::state::AppState;

/// Build and start the application without serving it.
pub async fn build_state(config: Arc<ConfigV1>) -> Result<AppState, Error> {
    let app = Arc::new(App::from_config(&config)?);
    app.start().await?;
    Ok(AppState { app })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the app cannot be built, the server fails to bind to
/// the configured address, or it encounters a runtime error.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Error> {
    let state = build_state(config.clone()).await?;
    let app = state.app.clone();
    let router = routes::create_router(state);

    info!("Starting server on {}", config.bind_address);
    let listener = TcpListener::bind(&config.bind_address).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
