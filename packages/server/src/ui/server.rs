//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, patch, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::{
    auth::USER_ID_HEADER,
    handler::{
        add_friend, get_conversation, get_online_users, health_check, list_friends,
        mark_message_seen, send_call_history, send_message, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Presence / signaling server
///
/// This struct holds the shared state and provides methods to build the router and run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Build the axum router
    ///
    /// # Arguments
    ///
    /// * `allowed_origins` - Browser origins allowed by the CORS layer
    pub fn router(&self, allowed_origins: &[String]) -> Router {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid allowed origin '{}'", origin);
                    None
                }
            })
            .collect();
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
            .allow_credentials(true);

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/online-users", get(get_online_users))
            .route("/api/friends/{user_id}", post(add_friend))
            .route("/api/messages/users", get(list_friends))
            .route("/api/messages/send/{receiver_id}", post(send_message))
            .route("/api/messages/call-history", post(send_call_history))
            .route("/api/messages/seen/{message_id}", patch(mark_message_seen))
            .route("/api/messages/{user_id}", get(get_conversation))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router(&config.allowed_origins);

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("LinkClub server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?userId=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
