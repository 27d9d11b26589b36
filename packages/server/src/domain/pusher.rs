//! MessagePusher trait 定義
//!
//! 接続ごとの送信チャンネルへのイベント送信を抽象化します。
//! ユーザー ID と接続の対応付けは `ConnectionRegistry` の責務であり、
//! MessagePusher は接続 ID だけを知っています。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// 接続ごとの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信に成功した接続
    pub delivered: Vec<ConnectionId>,
    /// 送信に失敗した接続（既に閉じている等）
    pub failed: Vec<ConnectionId>,
}

/// メッセージ通知の抽象化
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を送信対象として登録
    async fn attach(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を送信対象から外す（存在しなければ何もしない）
    async fn detach(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 接続中の全ての接続にイベントを送信（一部の失敗は他に影響しない）
    async fn broadcast_all(&self, event: &ServerEvent) -> Result<BroadcastReport, MessagePushError>;
}
