//! UseCase: 参加者切断処理
//!
//! ## 概要
//!
//! - 接続を MessagePusher から外す
//! - userId があれば Registry から無条件に削除（冪等）
//! - 変更後のオンラインユーザー全体を残りの全接続にアナウンス
//!
//! 通話中の切断でも `call-ended` は合成しません。相手への通知はクライアントが
//! 切断前に明示的に送る必要があります。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, UserId};

use super::announce_presence::{PresenceBroadcaster, PresenceChange};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceBroadcaster>,
}

impl DisconnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, presence: Arc<PresenceBroadcaster>) -> Self {
        Self {
            message_pusher,
            presence,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// Registry から削除された接続 ID（その userId の対応がなければ `None`）
    pub async fn execute(
        &self,
        user_id: Option<UserId>,
        connection_id: ConnectionId,
    ) -> Option<ConnectionId> {
        self.message_pusher.detach(&connection_id).await;

        let (removed, report) = match user_id {
            Some(user_id) => self.presence.apply(PresenceChange::Unregister(user_id)).await,
            None => (None, self.presence.announce().await),
        };
        if let Err(e) = report {
            tracing::warn!("Failed to announce presence: {}", e);
        }
        removed
    }
}
