//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `ServerEvent` を JSON フレームにエンコードして送信（push_to, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を接続 ID 単位で受け取り、送信に使用します。
//! userId を持たない匿名接続や、後から開いたタブに置き換えられた接続も
//! ここには残り、プレゼンスのブロードキャストを受け取ります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        BroadcastReport, ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent,
    },
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.attach(connection_id, tx).await;
/// pusher.push_to(&connection_id, &ServerEvent::user_offline()).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中の全ての接続の sender
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信対象として登録中の接続数
    #[cfg(test)]
    pub(crate) async fn count_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}

fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
    encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn attach(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.connections.lock().await.insert(connection_id, sender);
        tracing::debug!("Connection {} attached to MessagePusher", connection_id);
    }

    async fn detach(&self, connection_id: &ConnectionId) {
        self.connections.lock().await.remove(connection_id);
        tracing::debug!("Connection {} detached from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode(event)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|_| MessagePushError::ConnectionClosed(connection_id.to_string()))?;
        tracing::debug!("Pushed '{}' to connection {}", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast_all(&self, event: &ServerEvent) -> Result<BroadcastReport, MessagePushError> {
        let frame = encode(event)?;
        let connections = self.connections.lock().await;

        let mut report = BroadcastReport::default();
        for (connection_id, sender) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(frame.clone()) {
                tracing::warn!(
                    "Failed to push '{}' to connection {}: {}",
                    event.name(),
                    connection_id,
                    e
                );
                report.failed.push(*connection_id);
            } else {
                report.delivered.push(*connection_id);
            }
        }

        Ok(report)
    }
}
