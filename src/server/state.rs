//! Server state and connection parameters.

use std::sync::Arc;

use serde::Deserialize;

use crate::game::SessionRegistry;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "gameId")]
    pub game_id: String,
}

/// Shared application state
pub struct AppState {
    /// Registry of live game sessions
    pub registry: Arc<SessionRegistry>,
}
