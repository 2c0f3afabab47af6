//! WebSocket match server implementation.

mod connection;
mod handler;
mod runner;
mod signal;
mod state;

pub use runner::run_server;
