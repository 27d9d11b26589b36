//! ドメイン層のエラー定義

use thiserror::Error;

use super::entity::{CallState, MessageStatus};

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} bytes")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} is malformed")]
    Malformed(&'static str),
}

/// Repository（外部データストア）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Message '{0}' not found")]
    MessageNotFound(String),

    #[error("Message '{0}' already exists")]
    DuplicateMessage(String),

    #[error("Status transition rejected: {0}")]
    Transition(#[from] StatusTransitionError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// メッセージ送信（プッシュ）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("Connection '{0}' is closed")]
    ConnectionClosed(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// メッセージ状態の逆行エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move message status from {from:?} back to {to:?}")]
pub struct StatusTransitionError {
    pub from: MessageStatus,
    pub to: MessageStatus,
}

/// 通話状態機械の不正遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallTransitionError {
    #[error("call is already finished ({0:?})")]
    Finished(CallState),

    #[error("{event} is not allowed in state {state:?}")]
    NotAllowed {
        state: Option<CallState>,
        event: &'static str,
    },

    #[error("{0} is not a participant of this call")]
    NotParticipant(String),
}
