//! UseCase: 会話履歴の取得

use std::sync::Arc;

use crate::domain::{FriendshipRepository, Message, MessageRepository, UserId};

use super::error::GetConversationError;

pub struct GetConversationUseCase {
    friendships: Arc<dyn FriendshipRepository>,
    repository: Arc<dyn MessageRepository>,
}

impl GetConversationUseCase {
    pub fn new(
        friendships: Arc<dyn FriendshipRepository>,
        repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            friendships,
            repository,
        }
    }

    /// `caller` と `peer` の間のメッセージを作成順で返す
    pub async fn execute(
        &self,
        caller: &UserId,
        peer: &UserId,
    ) -> Result<Vec<Message>, GetConversationError> {
        if !self.friendships.are_friends(caller, peer).await? {
            return Err(GetConversationError::NotFriends);
        }
        Ok(self.repository.list_conversation(caller, peer).await?)
    }
}
