//! Presence / signaling server UI layer (HTTP + WebSocket).

mod auth;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
