//! UseCase: 参加者接続処理
//!
//! ## 概要
//!
//! - 接続を MessagePusher に登録（匿名接続もブロードキャストは受け取る）
//! - userId があれば Registry に登録（同じ userId の既存の対応は後勝ちで上書き、古い接続は閉じない）
//! - 変更後のオンラインユーザー全体を全接続にアナウンス

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, UserId};

use super::announce_presence::{PresenceBroadcaster, PresenceChange};

/// 接続結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    pub connection_id: ConnectionId,
    /// 同じ userId で以前登録されていた接続
    pub replaced: Option<ConnectionId>,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceBroadcaster>,
}

impl ConnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, presence: Arc<PresenceBroadcaster>) -> Self {
        Self {
            message_pusher,
            presence,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 接続時に申告された userId（なければ匿名接続）
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    pub async fn execute(&self, user_id: Option<UserId>, sender: PusherChannel) -> Connected {
        let connection_id = ConnectionId::generate();
        self.message_pusher.attach(connection_id, sender).await;

        let (replaced, report) = match user_id {
            Some(user_id) => {
                self.presence
                    .apply(PresenceChange::Register(user_id, connection_id))
                    .await
            }
            None => (None, self.presence.announce().await),
        };
        if let Err(e) = report {
            tracing::warn!("Failed to announce presence: {}", e);
        }

        Connected {
            connection_id,
            replaced,
        }
    }
}
