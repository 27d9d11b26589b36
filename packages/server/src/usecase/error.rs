//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// メッセージ送信（通常メッセージ・通話履歴）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("You can only send messages to friends")]
    NotFriends,

    #[error("Invalid message: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 既読処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkSeenError {
    #[error("Message not found")]
    MessageNotFound,

    /// 受信者以外が既読にしようとした
    #[error("Unauthorized")]
    NotReceiver,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 会話履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetConversationError {
    #[error("You can only view messages from friends")]
    NotFriends,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 友達登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddFriendError {
    #[error("Cannot befriend yourself")]
    SelfFriendship,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
