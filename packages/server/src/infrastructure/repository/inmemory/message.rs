//! InMemory Message Repository 実装
//!
//! 状態遷移は 1 回のロック内で read-modify-write するため、同一メッセージへの
//! 並行した更新は直列化されます。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    Message, MessageId, MessageRepository, MessageStatus, RepositoryError, StatusChange, UserId,
};

#[derive(Default)]
struct Store {
    messages: HashMap<MessageId, Message>,
    /// 挿入順
    order: Vec<MessageId>,
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    store: Mutex<Store>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: Message) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        if store.messages.contains_key(&message.id) {
            return Err(RepositoryError::DuplicateMessage(message.id.to_string()));
        }
        store.order.push(message.id);
        store.messages.insert(message.id, message);
        Ok(())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError> {
        Ok(self.store.lock().await.messages.get(id).cloned())
    }

    async fn advance_status(
        &self,
        id: &MessageId,
        status: MessageStatus,
        at: DateTime<Utc>,
    ) -> Result<(Message, StatusChange), RepositoryError> {
        let mut store = self.store.lock().await;
        let message = store
            .messages
            .get_mut(id)
            .ok_or_else(|| RepositoryError::MessageNotFound(id.to_string()))?;
        let change = message.advance_status(status, at)?;
        Ok((message.clone(), change))
    }

    async fn list_conversation(
        &self,
        user_a: &UserId,
        user_b: &UserId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let store = self.store.lock().await;
        let conversation = store
            .order
            .iter()
            .filter_map(|id| store.messages.get(id))
            .filter(|m| {
                (&m.sender_id == user_a && &m.receiver_id == user_b)
                    || (&m.sender_id == user_b && &m.receiver_id == user_a)
            })
            .cloned()
            .collect();
        Ok(conversation)
    }
}
