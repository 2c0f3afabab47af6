//! Rock-paper-scissors match server library.
//!
//! Pairs two remote players over a WebSocket connection identified by a short
//! connect code, runs a repeating move-submission/resolution cycle, and tears
//! the pairing down cleanly on disconnect or expiry.

pub mod config;
pub mod error;
pub mod game;
pub mod server;

// shared library
pub mod common;
