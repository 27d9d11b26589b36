//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::{
    ConnectionId, Message, MessageId, MessageStatus, RepositoryError, StatusChange, UserId,
};

/// Connection Registry trait
///
/// userId → connectionId の対応表。1 ユーザーにつき 1 接続のみ記録し、後勝ちで上書きする。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 対応を登録（既存の対応は上書き）し、置き換えられた接続 ID を返す
    async fn register(&self, user_id: UserId, connection_id: ConnectionId)
    -> Option<ConnectionId>;

    /// 対応を無条件に削除（存在しなければ何もしない）
    async fn unregister(&self, user_id: &UserId) -> Option<ConnectionId>;

    /// 指定の接続に対応している場合のみ削除
    async fn unregister_connection(&self, user_id: &UserId, connection_id: &ConnectionId)
    -> bool;

    /// userId に対応する接続 ID を取得
    async fn lookup(&self, user_id: &UserId) -> Option<ConnectionId>;

    /// 登録中の全ての userId
    async fn online_user_ids(&self) -> Vec<UserId>;
}

/// Message Repository trait
///
/// メッセージの永続化（外部ドキュメントストア）への境界。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 新規メッセージを保存
    async fn insert(&self, message: Message) -> Result<(), RepositoryError>;

    /// ID でメッセージを取得
    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError>;

    /// メッセージの状態を read-modify-write で前進させ、更新後のメッセージを返す
    ///
    /// 同一メッセージへの更新はストア側で直列化される。
    async fn advance_status(
        &self,
        id: &MessageId,
        status: MessageStatus,
        at: DateTime<Utc>,
    ) -> Result<(Message, StatusChange), RepositoryError>;

    /// 2 ユーザー間のメッセージを作成順で取得
    async fn list_conversation(
        &self,
        user_a: &UserId,
        user_b: &UserId,
    ) -> Result<Vec<Message>, RepositoryError>;
}

/// Friendship Repository trait
///
/// 友達関係（外部コラボレーター）への境界。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// 2 ユーザーが相互に友達かどうか
    async fn are_friends(&self, user_a: &UserId, user_b: &UserId) -> Result<bool, RepositoryError>;

    /// 相互の友達関係を記録
    async fn befriend(&self, user_a: &UserId, user_b: &UserId) -> Result<(), RepositoryError>;

    /// `user_id` の友達一覧
    async fn list_friends(&self, user_id: &UserId) -> Result<Vec<UserId>, RepositoryError>;
}
