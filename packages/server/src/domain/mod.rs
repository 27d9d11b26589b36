//! ドメイン層
//!
//! Value Object、エンティティ、イベント、そして外部境界の trait を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    CallEvent, CallRecord, CallSession, CallSessionBook, CallState, Message, MessageContent,
    MessageStatus, StatusChange,
};
pub use error::{
    CallTransitionError, MessagePushError, RepositoryError, StatusTransitionError,
    ValueObjectError,
};
pub use event::{ServerEvent, Signal, SignalFlavor, USER_OFFLINE_REASON};
pub use pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use repository::{ConnectionRegistry, FriendshipRepository, MessageRepository};
pub use value_object::{CallId, CallType, ConnectionId, MessageId, UserId};

#[cfg(test)]
pub use repository::{MockFriendshipRepository, MockMessageRepository};
