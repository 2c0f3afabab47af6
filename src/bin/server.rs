//! Rock-paper-scissors match server.
//!
//! Pairs two players per session over WebSocket and resolves rounds.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! RPS_APP_PORT=8080 cargo run --bin server
//! ```

use clap::Parser;

use rps_app_rs::{
    common::logger::setup_logger,
    config::port_from_env,
    server::run_server,
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Rock-paper-scissors match server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to (falls back to RPS_APP_PORT, then 5000)
    #[arg(short = 'p', long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let port = args.port.unwrap_or_else(port_from_env);

    if let Err(e) = run_server(args.host, port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
