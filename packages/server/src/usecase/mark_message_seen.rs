//! UseCase: 既読処理
//!
//! ## 概要
//!
//! - 既読にできるのはメッセージの受信者のみ（状態を変更する前に確認）
//! - `sent` / `delivered` → `seen` に進め、送信者に `messageSeen` を返す
//! - 既に `seen` のメッセージへの既読は no-op（エラーにもならず、通知もしない）

use std::sync::Arc;

use linkclub_shared::time::Clock;

use crate::domain::{
    MessageId, MessageRepository, MessageStatus, ServerEvent, StatusChange, UserId,
};

use super::{error::MarkSeenError, route_event::EventRouter};

/// 既読処理のユースケース
pub struct MarkMessageSeenUseCase {
    repository: Arc<dyn MessageRepository>,
    router: Arc<EventRouter>,
    clock: Arc<dyn Clock>,
}

impl MarkMessageSeenUseCase {
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

    /// 既読処理を実行
    ///
    /// # Returns
    ///
    /// * `Ok(StatusChange::Advanced)` - seen に進めた
    /// * `Ok(StatusChange::Unchanged)` - 既に seen だった
    /// * `Err(MarkSeenError)` - 存在しない、受信者ではない、ストア障害
    pub async fn execute(
        &self,
        caller: &UserId,
        message_id: &MessageId,
    ) -> Result<StatusChange, MarkSeenError> {
        let message = self
            .repository
            .find_by_id(message_id)
            .await?
            .ok_or(MarkSeenError::MessageNotFound)?;

        if &message.receiver_id != caller {
            tracing::warn!(
                "'{}' tried to mark message {} seen but is not its receiver",
                caller,
                message_id
            );
            return Err(MarkSeenError::NotReceiver);
        }

        let (message, change) = self
            .repository
            .advance_status(message_id, MessageStatus::Seen, self.clock.now())
            .await?;

        if let (StatusChange::Advanced, Some(seen_at)) = (change, message.seen_at) {
            self.router
                .route(
                    &message.sender_id,
                    &ServerEvent::MessageSeen {
                        message_id: message.id,
                        seen_at,
                    },
                )
                .await;
        }
        Ok(change)
    }
}
