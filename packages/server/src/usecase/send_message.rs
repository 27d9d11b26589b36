//! UseCase: メッセージ送信処理
//!
//! ## 概要
//!
//! - 送信者と受信者が相互に友達であることを確認
//! - `sent` のメッセージを作成し、配送パイプラインに渡す
//!
//! ## テストで想定している状況
//!
//! - 正常系：受信者オンライン（delivered まで進む）、受信者オフライン（sent のまま）
//! - 異常系：友達ではない相手への送信、空のメッセージ

use std::sync::Arc;

use linkclub_shared::time::Clock;

use crate::domain::{FriendshipRepository, Message, MessageContent, UserId};

use super::{deliver_message::DeliverMessageUseCase, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    friendships: Arc<dyn FriendshipRepository>,
    delivery: Arc<DeliverMessageUseCase>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 保存されたメッセージ（配送できた場合は `delivered`）
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: Option<String>,
        image: Option<String>,
    ) -> Result<Message, SendMessageError> {
        if !self.friendships.are_friends(&sender_id, &receiver_id).await? {
            return Err(SendMessageError::NotFriends);
        }

        let content = MessageContent::new(text, image)
            .map_err(|e| SendMessageError::InvalidInput(e.to_string()))?;
        let message = Message::new(sender_id, receiver_id, content, self.clock.now());

        Ok(self.delivery.execute(message).await?)
    }
}
