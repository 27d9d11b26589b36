//! UseCase: サイドバー用の友達一覧の取得

use std::sync::Arc;

use crate::domain::{FriendshipRepository, RepositoryError, UserId};

pub struct ListFriendsUseCase {
    friendships: Arc<dyn FriendshipRepository>,
}

impl ListFriendsUseCase {
    pub fn new(friendships: Arc<dyn FriendshipRepository>) -> Self {
        Self { friendships }
    }

    /// `caller` の友達を昇順で返す
    pub async fn execute(&self, caller: &UserId) -> Result<Vec<UserId>, RepositoryError> {
        self.friendships.list_friends(caller).await
    }
}
