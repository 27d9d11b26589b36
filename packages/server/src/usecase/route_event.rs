//! UseCase: イベントルーティング
//!
//! 特定のユーザーに届くイベントは必ずここを通ります。Registry を引いて
//! 接続があれば送信し、なければ `TargetOffline` を返します（キューもリトライもしない）。
//!
//! 登録されているのに送信に失敗した接続は切断とみなし、その接続の対応だけを
//! Registry から遅延削除します。削除は Presence Broadcaster を通すため、
//! 残りの接続には新しいオンライン一覧が届きます。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher, ServerEvent, UserId,
};

use super::announce_presence::{PresenceBroadcaster, PresenceChange};

/// ルーティング結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// 指定の接続に送信した
    Delivered(ConnectionId),
    /// 宛先の接続がない（例外ではなく通常の結果）
    TargetOffline,
}

impl RouteOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Event Router
pub struct EventRouter {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceBroadcaster>,
}

impl EventRouter {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceBroadcaster>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            presence,
        }
    }

    /// `target` の接続にイベントを送信
    pub async fn route(&self, target: &UserId, event: &ServerEvent) -> RouteOutcome {
        let Some(connection_id) = self.registry.lookup(target).await else {
            tracing::debug!("'{}' not routed: user '{}' is offline", event.name(), target);
            return RouteOutcome::TargetOffline;
        };

        match self.message_pusher.push_to(&connection_id, event).await {
            Ok(()) => RouteOutcome::Delivered(connection_id),
            Err(e @ (MessagePushError::ConnectionClosed(_) | MessagePushError::ConnectionNotFound(_))) => {
                tracing::warn!(
                    "'{}' not routed to '{}': {}; dropping stale registry entry",
                    event.name(),
                    target,
                    e
                );
                let (_removed, report) = self
                    .presence
                    .apply(PresenceChange::UnregisterConnection(
                        target.clone(),
                        connection_id,
                    ))
                    .await;
                if let Err(e) = report {
                    tracing::warn!("Failed to announce presence after dropping '{}': {}", target, e);
                }
                RouteOutcome::TargetOffline
            }
            Err(e) => {
                tracing::warn!("'{}' not routed to '{}': {}", event.name(), target, e);
                RouteOutcome::TargetOffline
            }
        }
    }

    /// イベントを発生元の接続そのものに返す（Registry は引かない）
    pub async fn reply(&self, connection_id: &ConnectionId, event: &ServerEvent) -> RouteOutcome {
        match self.message_pusher.push_to(connection_id, event).await {
            Ok(()) => RouteOutcome::Delivered(*connection_id),
            Err(e) => {
                tracing::warn!(
                    "'{}' not sent back to connection {}: {}",
                    event.name(),
                    connection_id,
                    e
                );
                RouteOutcome::TargetOffline
            }
        }
    }
}
