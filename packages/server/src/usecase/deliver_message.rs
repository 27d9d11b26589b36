//! UseCase: メッセージ配送パイプライン
//!
//! 通常メッセージと通話履歴メッセージで共通の処理です。
//!
//! 1. `sent` で保存
//! 2. 受信者がオンラインなら `newMessage` をルーティング
//! 3. 届いた場合のみ `delivered` に進めて保存し、送信者に `messageDelivered` を返す
//!
//! 受信者がオフラインなら `sent` のまま残り、後から再接続しても `delivered` にはしません。
//!
//! `newMessage` は保存直後のレコード（`status: "sent"`、`deliveredAt` なし）をそのまま送ります。
//! 受信者は届いたこと自体で配送を知り、送信者には `messageDelivered` で伝えます。
//!
//! プッシュから `delivered` への更新までの間に受信者が既読にした場合、メッセージは
//! 既に `seen` なので `delivered` への更新は行わず、保存済みのメッセージを返します。

use std::sync::Arc;

use linkclub_shared::time::Clock;

use crate::domain::{
    Message, MessageRepository, MessageStatus, RepositoryError, ServerEvent, StatusChange,
};

use super::route_event::EventRouter;

pub struct DeliverMessageUseCase {
    repository: Arc<dyn MessageRepository>,
    router: Arc<EventRouter>,
    clock: Arc<dyn Clock>,
}

impl DeliverMessageUseCase {
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        router: Arc<EventRouter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            router,
            clock,
        }
    }

    /// 新しいメッセージを保存して配送し、最終的な状態のメッセージを返す
    pub async fn execute(&self, message: Message) -> Result<Message, RepositoryError> {
        self.repository.insert(message.clone()).await?;

        let outcome = self
            .router
            .route(
                &message.receiver_id,
                &ServerEvent::NewMessage(Box::new(message.clone())),
            )
            .await;
        if !outcome.is_delivered() {
            tracing::debug!(
                "Message {} stays sent: '{}' is offline",
                message.id,
                message.receiver_id
            );
            return Ok(message);
        }

        let (message, change) = match self
            .repository
            .advance_status(&message.id, MessageStatus::Delivered, self.clock.now())
            .await
        {
            Ok(advanced) => advanced,
            Err(RepositoryError::Transition(e)) => {
                tracing::debug!(
                    "Message {} already {:?}; not marking it delivered",
                    message.id,
                    e.from
                );
                let stored = self.repository.find_by_id(&message.id).await?;
                return Ok(stored.unwrap_or(message));
            }
            Err(e) => return Err(e),
        };
        if let (StatusChange::Advanced, Some(delivered_at)) = (change, message.delivered_at) {
            self.router
                .route(
                    &message.sender_id,
                    &ServerEvent::MessageDelivered {
                        message_id: message.id,
                        delivered_at,
                    },
                )
                .await;
        }
        Ok(message)
    }
}
