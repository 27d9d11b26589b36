//! UseCase: オンラインユーザー一覧の取得

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, UserId};

pub struct GetOnlineUsersUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetOnlineUsersUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 登録中の userId を昇順で返す
    pub async fn execute(&self) -> Vec<UserId> {
        let mut user_ids = self.registry.online_user_ids().await;
        user_ids.sort();
        user_ids
    }
}
