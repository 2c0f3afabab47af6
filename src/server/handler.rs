//! HTTP and WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, ws::WebSocketUpgrade},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::RegistryError;
use crate::game::GameInfo;

use super::connection;
use super::state::{AppState, ConnectQuery};

/// Body of a create-game request.
#[derive(Debug, Deserialize)]
pub struct CreateGameInput {
    #[serde(default)]
    pub required_wins: i64,
    #[serde(default)]
    pub time_limit: i64,
}

/// `POST /create_game` - mint a new session and hand back its connect info.
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateGameInput>,
) -> Result<Json<GameInfo>, RegistryError> {
    let info = state
        .registry
        .create_session(input.required_wins, input.time_limit)
        .await?;
    Ok(Json(info))
}

/// `GET /test` - liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!(true))
}

/// `GET /connect?gameId=CODE` - upgrade and hand the socket to its session.
///
/// The code is trimmed and upper-cased before lookup. An unknown code still
/// upgrades; the connection actor then closes the socket with a readable
/// reason, matching how a full session is rejected after `Join`.
pub async fn connect_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let code = query.game_id.trim().to_uppercase();
    tracing::info!("connecting to game: {}", code);

    let session = state.registry.lookup(&code).await;
    if session.is_none() {
        tracing::warn!("unknown connect code: {}", code);
    }
    ws.on_upgrade(move |socket| connection::run(socket, session))
}
