//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::game::SessionRegistry;

use super::{
    handler::{connect_handler, create_game, health_check},
    signal::shutdown_signal,
    state::AppState,
};

/// Run the match server
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 5000)
pub async fn run_server(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = format!("{}:{}", host, port);

    // Create the session registry and seed the fixed-code practice session
    let registry = SessionRegistry::new(format!("ws://{}", bind_addr));
    registry.seed_practice().await;
    let app_state = Arc::new(AppState { registry });

    let app = Router::new()
        .route("/test", get(health_check))
        .route("/create_game", post(create_game))
        .route("/connect", get(connect_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("match server listening on {}", listener.local_addr()?);
    tracing::info!("Connect to: ws://{}/connect?gameId=CODE", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    // Set up graceful shutdown signal handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
