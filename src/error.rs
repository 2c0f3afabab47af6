//! Error types for the match server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the session registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The live-session ceiling has been reached.
    #[error("game limit reached")]
    GameLimitReached,

    /// No unique connect code was found within the retry bound.
    #[error("couldn't generate unique code in {0} tries")]
    CodeGenerationExhausted(usize),
}

/// Errors returned when a connection asks a session for a seat.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    /// Both seats are already taken.
    #[error("game full")]
    GameFull,

    /// The session's mailbox is gone (already torn down).
    #[error("game is no longer available")]
    SessionClosed,
}

/// JSON error envelope returned by the HTTP boundary.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
