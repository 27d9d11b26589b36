//! LinkClub presence / signaling server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linkclub-server
//! cargo run --bin linkclub-server -- --host 0.0.0.0 --port 5001 --allowed-origin http://localhost:5173
//! ```

use std::sync::Arc;

use clap::Parser;
use linkclub_server::{config::ServerConfig, ui::AppState, ui::Server};
use linkclub_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    let server = Server::new(AppState::in_memory(Arc::new(SystemClock)));
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
