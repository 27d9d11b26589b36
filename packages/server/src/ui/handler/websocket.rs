//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, UserId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ConnectQuery {
    /// 申告された userId（なし・不正な値は匿名接続として扱う）
    fn user_id(&self) -> Option<UserId> {
        let raw = self.user_id.as_deref()?;
        if raw == "undefined" {
            return None;
        }
        match UserId::new(raw.to_string()) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                tracing::warn!("Invalid userId '{}' ({}); connecting anonymously", raw, e);
                None
            }
        }
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let user_id = query.user_id();
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Spawns a task that receives events from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: events routed to this connection (via rx channel)
/// are written to the socket in the order they were pushed.
///
/// # Arguments
///
/// * `rx` - Channel receiver for encoded events
/// * `sender` - WebSocket sink of this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: Option<UserId>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // 送信タスクを先に起動し、接続直後の getOnlineUsers を取りこぼさない
    let mut send_task = pusher_loop(rx, sender);

    let connected = state
        .connect_participant_usecase
        .execute(user_id.clone(), tx)
        .await;
    let connection_id = connected.connection_id;
    match &user_id {
        Some(user_id) => tracing::info!("'{}' connected as {}", user_id, connection_id),
        None => tracing::info!("Anonymous connection {}", connection_id),
    }

    let state_clone = state.clone();
    let user_id_clone = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(
                        &state_clone,
                        user_id_clone.as_ref(),
                        connection_id,
                        text.as_str(),
                    )
                    .await;
                }
                Message::Ping(_) => {
                    tracing::trace!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(user_id.clone(), connection_id)
        .await;
    match &user_id {
        Some(user_id) => tracing::info!("'{}' disconnected ({})", user_id, connection_id),
        None => tracing::info!("Anonymous connection {} closed", connection_id),
    }
}

/// クライアントから届いた 1 イベントを処理する（失敗はこのイベントだけに閉じる）
async fn handle_client_event(
    state: &AppState,
    user_id: Option<&UserId>,
    connection_id: ConnectionId,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropped malformed event from {}: {}", connection_id, e);
            return;
        }
    };

    let Some(from_user_id) = user_id else {
        tracing::warn!(
            "Dropped signaling event from anonymous connection {}",
            connection_id
        );
        return;
    };

    let (target_user_id, signal) = event.into_signal();
    state
        .relay_signal_usecase
        .execute(from_user_id.clone(), connection_id, target_user_id, signal)
        .await;
}
