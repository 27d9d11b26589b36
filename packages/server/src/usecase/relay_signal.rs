//! UseCase: 通話シグナリングの中継
//!
//! サーバーは通話状態を持たない純粋な中継です。受け取ったシグナルに送信者の
//! userId を付けて `targetUserId` の接続へ転送します。ICE candidate の重複排除や
//! 並べ替えは行いません。
//!
//! 宛先がオフラインの場合:
//! - `call-invitation`: 発信元の接続にだけ `call-failed` を返す
//! - それ以外（レガシーの offer/answer/ICE/reject/end と `call-response`）: 何も返さず破棄

use std::sync::Arc;

use crate::domain::{ConnectionId, ServerEvent, Signal, UserId};

use super::route_event::{EventRouter, RouteOutcome};

/// 中継結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Relayed,
    /// 宛先オフラインのため破棄
    Dropped,
    /// 宛先オフラインを発信者に通知した
    InitiatorNotified,
}

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    router: Arc<EventRouter>,
}

impl RelaySignalUseCase {
    pub fn new(router: Arc<EventRouter>) -> Self {
        Self { router }
    }

    /// シグナルを中継
    ///
    /// # Arguments
    ///
    /// * `from_user_id` - 送信元の接続が接続時に申告した userId
    /// * `origin` - 送信元の接続 ID（オフライン通知の返送先）
    /// * `target_user_id` - 宛先
    /// * `signal` - 中継するシグナル
    pub async fn execute(
        &self,
        from_user_id: UserId,
        origin: ConnectionId,
        target_user_id: UserId,
        signal: Signal,
    ) -> RelayOutcome {
        let is_invitation = matches!(signal, Signal::Invitation { .. });
        let flavor = signal.flavor();
        let event = signal.into_event(from_user_id.clone());

        match self.router.route(&target_user_id, &event).await {
            RouteOutcome::Delivered(_) => {
                tracing::debug!(
                    "Relayed '{}' ({:?}) from '{}' to '{}'",
                    event.name(),
                    flavor,
                    from_user_id,
                    target_user_id
                );
                RelayOutcome::Relayed
            }
            RouteOutcome::TargetOffline if is_invitation => {
                tracing::info!(
                    "Call invitation from '{}' failed: '{}' is offline",
                    from_user_id,
                    target_user_id
                );
                self.router
                    .reply(&origin, &ServerEvent::user_offline())
                    .await;
                RelayOutcome::InitiatorNotified
            }
            RouteOutcome::TargetOffline => RelayOutcome::Dropped,
        }
    }
}
