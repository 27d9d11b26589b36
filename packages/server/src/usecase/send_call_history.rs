//! UseCase: 通話履歴メッセージの送信
//!
//! 通話終了後に「Video call ended」/「Audio call ended」のメッセージを残し、
//! 通常メッセージと同じ配送パイプラインに流します。

use std::sync::Arc;

use linkclub_shared::time::Clock;

use crate::domain::{CallRecord, FriendshipRepository, Message, UserId};

use super::{deliver_message::DeliverMessageUseCase, error::SendMessageError};

/// 通話履歴メッセージ送信のユースケース
pub struct SendCallHistoryUseCase {
    friendships: Arc<dyn FriendshipRepository>,
    delivery: Arc<DeliverMessageUseCase>,
    clock: Arc<dyn Clock>,
}

impl SendCallHistoryUseCase {
    pub fn new(
        friendships: Arc<dyn FriendshipRepository>,
        delivery: Arc<DeliverMessageUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            friendships,
            delivery,
            clock,
        }
    }

    pub async fn execute(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        call: CallRecord,
    ) -> Result<Message, SendMessageError> {
        if !self.friendships.are_friends(&sender_id, &receiver_id).await? {
            return Err(SendMessageError::NotFriends);
        }

        let message = Message::call_history(sender_id, receiver_id, call, self.clock.now());
        Ok(self.delivery.execute(message).await?)
    }
}
