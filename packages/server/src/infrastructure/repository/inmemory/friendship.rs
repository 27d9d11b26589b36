//! InMemory Friendship Repository 実装
//!
//! 友達申請フローは外部にあるため、ここでは相互の友達関係だけを保持します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{FriendshipRepository, RepositoryError, UserId};

#[derive(Default)]
pub struct InMemoryFriendshipRepository {
    friends: Mutex<HashMap<UserId, HashSet<UserId>>>,
}

impl InMemoryFriendshipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn are_friends(&self, user_a: &UserId, user_b: &UserId) -> Result<bool, RepositoryError> {
        let friends = self.friends.lock().await;
        let a_knows_b = friends.get(user_a).is_some_and(|set| set.contains(user_b));
        let b_knows_a = friends.get(user_b).is_some_and(|set| set.contains(user_a));
        Ok(a_knows_b && b_knows_a)
    }

    async fn befriend(&self, user_a: &UserId, user_b: &UserId) -> Result<(), RepositoryError> {
        let mut friends = self.friends.lock().await;
        friends
            .entry(user_a.clone())
            .or_default()
            .insert(user_b.clone());
        friends
            .entry(user_b.clone())
            .or_default()
            .insert(user_a.clone());
        Ok(())
    }

    async fn list_friends(&self, user_id: &UserId) -> Result<Vec<UserId>, RepositoryError> {
        let friends = self.friends.lock().await;
        let mut list: Vec<UserId> = friends
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        list.sort();
        Ok(list)
    }
}
