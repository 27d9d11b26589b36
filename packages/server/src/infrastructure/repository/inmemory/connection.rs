//! InMemory Connection Registry 実装
//!
//! userId → connectionId のプレゼンスマップ。サーバープロセスごとに 1 つ生成し、
//! `AppState` 経由で注入します（モジュールレベルのシングルトンにはしない）。
//!
//! ロックの保持は 1 回の upsert / delete / lookup のみに限定します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, UserId};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    entries: Mutex<HashMap<UserId, ConnectionId>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
    ) -> Option<ConnectionId> {
        let replaced = self
            .entries
            .lock()
            .await
            .insert(user_id.clone(), connection_id);
        if let Some(previous) = replaced {
            tracing::debug!(
                "User '{}' re-registered: connection {} replaces {}",
                user_id,
                connection_id,
                previous
            );
        }
        replaced
    }

    async fn unregister(&self, user_id: &UserId) -> Option<ConnectionId> {
        self.entries.lock().await.remove(user_id)
    }

    async fn unregister_connection(
        &self,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.get(user_id) == Some(connection_id) {
            entries.remove(user_id);
            true
        } else {
            false
        }
    }

    async fn lookup(&self, user_id: &UserId) -> Option<ConnectionId> {
        self.entries.lock().await.get(user_id).copied()
    }

    async fn online_user_ids(&self) -> Vec<UserId> {
        self.entries.lock().await.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - register / unregister / lookup の後勝ち（last-write-wins）セマンティクス
    // - unregister の冪等性
    // - unregister_connection が別の接続の対応を消さないこと
    // ========================================

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_reflects_latest_register() {
        // テスト項目: 同じ userId への register は後勝ちで、異なる userId は独立している
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (c1, c2, c3) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );

        // when (操作):
        let first = registry.register(user("alice"), c1).await;
        registry.register(user("bob"), c2).await;
        let replaced = registry.register(user("alice"), c3).await;

        // then (期待する結果):
        assert_eq!(first, None);
        assert_eq!(replaced, Some(c1));
        assert_eq!(registry.lookup(&user("alice")).await, Some(c3));
        assert_eq!(registry.lookup(&user("bob")).await, Some(c2));
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: unregister 後は absent になり、2 回目の unregister も問題なく処理される
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let c1 = ConnectionId::generate();
        registry.register(user("alice"), c1).await;

        // when (操作):
        let first = registry.unregister(&user("alice")).await;
        let second = registry.unregister(&user("alice")).await;

        // then (期待する結果):
        assert_eq!(first, Some(c1));
        assert_eq!(second, None);
        assert_eq!(registry.lookup(&user("alice")).await, None);
    }

    #[tokio::test]
    async fn test_interleaved_operations() {
        // テスト項目: register / unregister を交互に行っても常に最新の操作が反映される
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let ids: Vec<ConnectionId> = (0..4).map(|_| ConnectionId::generate()).collect();

        // when (操作):
        registry.register(user("alice"), ids[0]).await;
        registry.register(user("bob"), ids[1]).await;
        registry.unregister(&user("alice")).await;
        registry.register(user("bob"), ids[2]).await;
        registry.register(user("alice"), ids[3]).await;
        registry.unregister(&user("carol")).await;

        // then (期待する結果):
        assert_eq!(registry.lookup(&user("alice")).await, Some(ids[3]));
        assert_eq!(registry.lookup(&user("bob")).await, Some(ids[2]));
        let mut online = registry.online_user_ids().await;
        online.sort();
        assert_eq!(online, vec![user("alice"), user("bob")]);
    }

    #[tokio::test]
    async fn test_unregister_connection_keeps_newer_mapping() {
        // テスト項目: 置き換えられた古い接続の削除は新しい対応を消さない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (old, new) = (ConnectionId::generate(), ConnectionId::generate());
        registry.register(user("alice"), old).await;
        registry.register(user("alice"), new).await;

        // when (操作):
        let removed_old = registry.unregister_connection(&user("alice"), &old).await;
        let removed_new = registry.unregister_connection(&user("alice"), &new).await;

        // then (期待する結果):
        assert!(!removed_old);
        assert!(removed_new);
        assert_eq!(registry.lookup(&user("alice")).await, None);
    }
}
