//! UseCase: プレゼンスのブロードキャスト
//!
//! Registry の変更のたびに、その時点のオンラインユーザー全体（差分ではなくスナップショット）を
//! 接続中の全ての接続に `getOnlineUsers` として送ります。
//!
//! Registry の変更とその直後のブロードキャストは `gate` の内側で行うため、
//! 他のユーザーの接続・切断と交錯せず、送信順もスナップショット順と一致します。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    BroadcastReport, ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher,
    ServerEvent, UserId,
};

/// Registry への変更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceChange {
    Register(UserId, ConnectionId),
    Unregister(UserId),
    /// 指定の接続に対応している場合のみ削除（送信失敗で検出した切断）
    UnregisterConnection(UserId, ConnectionId),
}

/// Presence Broadcaster
pub struct PresenceBroadcaster {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Mutex<()>,
}

impl PresenceBroadcaster {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            gate: Mutex::new(()),
        }
    }

    /// 現在のオンラインユーザー全体を全接続に送信
    pub async fn announce(&self) -> Result<BroadcastReport, MessagePushError> {
        let _gate = self.gate.lock().await;
        self.broadcast_snapshot().await
    }

    /// Registry を変更し、続けてブロードキャストする
    ///
    /// # Returns
    ///
    /// 置き換えられた、または削除された接続 ID とブロードキャスト結果。
    /// `UnregisterConnection` で何も削除しなかった場合はブロードキャストしない。
    pub async fn apply(
        &self,
        change: PresenceChange,
    ) -> (Option<ConnectionId>, Result<BroadcastReport, MessagePushError>) {
        let _gate = self.gate.lock().await;
        let previous = match change {
            PresenceChange::Register(user_id, connection_id) => {
                self.registry.register(user_id, connection_id).await
            }
            PresenceChange::Unregister(user_id) => self.registry.unregister(&user_id).await,
            PresenceChange::UnregisterConnection(user_id, connection_id) => {
                if !self
                    .registry
                    .unregister_connection(&user_id, &connection_id)
                    .await
                {
                    return (None, Ok(BroadcastReport::default()));
                }
                Some(connection_id)
            }
        };
        (previous, self.broadcast_snapshot().await)
    }

    async fn broadcast_snapshot(&self) -> Result<BroadcastReport, MessagePushError> {
        let mut online = self.registry.online_user_ids().await;
        online.sort();
        let count = online.len();

        let report = self
            .message_pusher
            .broadcast_all(&ServerEvent::OnlineUsers(online))
            .await?;
        tracing::debug!(
            "Announced {} online user(s) to {} connection(s) ({} failed)",
            count,
            report.delivered.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestHub, user};
    use serde_json::Value;
    use std::collections::HashSet;

    fn online_set(frame: &Value) -> HashSet<String> {
        assert_eq!(frame["event"], "getOnlineUsers");
        frame["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_every_connection_receives_full_snapshot() {
        // テスト項目: Registry 変更後、全ての接続が Registry 全体と集合として等しいスナップショットを受け取る
        // given (前提条件):
        let hub = TestHub::new();
        let (_a, mut alice_rx) = hub.register("alice").await;
        let (_b, mut bob_rx) = hub.register("bob").await;
        let (_anon, mut anon_rx) = hub.attach_anonymous().await;
        let carol_conn = ConnectionId::generate();

        // when (操作):
        let (previous, report) = hub
            .presence
            .apply(PresenceChange::Register(user("carol"), carol_conn))
            .await;

        // then (期待する結果):
        assert_eq!(previous, None);
        assert_eq!(report.unwrap().delivered.len(), 3);
        let expected: HashSet<String> = ["alice", "bob", "carol"]
            .into_iter()
            .map(String::from)
            .collect();
        for rx in [&mut alice_rx, &mut bob_rx, &mut anon_rx] {
            assert_eq!(online_set(&TestHub::next_frame(rx)), expected);
        }
    }

    #[tokio::test]
    async fn test_unregister_announces_remaining_users() {
        // テスト項目: unregister 後のスナップショットから該当ユーザーが消える
        // given (前提条件):
        let hub = TestHub::new();
        let (_a, mut alice_rx) = hub.register("alice").await;
        let (bob_conn, _bob_rx) = hub.register("bob").await;

        // when (操作):
        let (removed, _report) = hub
            .presence
            .apply(PresenceChange::Unregister(user("bob")))
            .await;

        // then (期待する結果):
        assert_eq!(removed, Some(bob_conn));
        let expected: HashSet<String> = ["alice".to_string()].into_iter().collect();
        assert_eq!(online_set(&TestHub::next_frame(&mut alice_rx)), expected);
    }

    #[tokio::test]
    async fn test_unregister_connection_announces_only_on_removal() {
        // テスト項目: 接続指定の削除は、対応が一致した場合だけ削除してアナウンスする
        // given (前提条件):
        let hub = TestHub::new();
        let (_a, mut alice_rx) = hub.register("alice").await;
        let (old_conn, _old_rx) = hub.register("bob").await;
        let (new_conn, _new_rx) = hub.register("bob").await;

        // when (操作): 置き換え済みの接続を指定
        let (removed, report) = hub
            .presence
            .apply(PresenceChange::UnregisterConnection(user("bob"), old_conn))
            .await;

        // then (期待する結果):
        assert_eq!(removed, None);
        assert_eq!(report, Ok(BroadcastReport::default()));
        assert!(alice_rx.try_recv().is_err());

        // when (操作): 現在の接続を指定
        let (removed, _report) = hub
            .presence
            .apply(PresenceChange::UnregisterConnection(user("bob"), new_conn))
            .await;

        // then (期待する結果):
        assert_eq!(removed, Some(new_conn));
        let expected: HashSet<String> = ["alice".to_string()].into_iter().collect();
        assert_eq!(online_set(&TestHub::next_frame(&mut alice_rx)), expected);
    }

    #[tokio::test]
    async fn test_dead_connection_does_not_block_announce() {
        // テスト項目: 閉じた接続があっても他の接続へのアナウンスは届く
        // given (前提条件):
        let hub = TestHub::new();
        let (_a, alice_rx) = hub.register("alice").await;
        let (_b, mut bob_rx) = hub.register("bob").await;
        drop(alice_rx);

        // when (操作):
        let report = hub.presence.announce().await.unwrap();

        // then (期待する結果):
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.delivered.len(), 1);
        assert_eq!(online_set(&TestHub::next_frame(&mut bob_rx)).len(), 2);
    }
}
