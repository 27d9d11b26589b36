//! UseCase: 友達登録
//!
//! 友達関係は本来外部サービスの管轄で、ここでは相互登録のみ行います。

use std::sync::Arc;

use crate::domain::{FriendshipRepository, UserId};

use super::error::AddFriendError;

pub struct AddFriendUseCase {
    friendships: Arc<dyn FriendshipRepository>,
}

impl AddFriendUseCase {
    pub fn new(friendships: Arc<dyn FriendshipRepository>) -> Self {
        Self { friendships }
    }

    pub async fn execute(&self, user_id: &UserId, friend_id: &UserId) -> Result<(), AddFriendError> {
        if user_id == friend_id {
            return Err(AddFriendError::SelfFriendship);
        }
        self.friendships.befriend(user_id, friend_id).await?;
        tracing::info!("'{}' and '{}' are now friends", user_id, friend_id);
        Ok(())
    }
}
