//! Server state shared by the handlers.

use std::sync::Arc;

use linkclub_shared::time::Clock;

use crate::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryConnectionRegistry, InMemoryFriendshipRepository, InMemoryMessageRepository,
        },
    },
    usecase::{
        AddFriendUseCase, ConnectParticipantUseCase, DeliverMessageUseCase,
        DisconnectParticipantUseCase, EventRouter, GetConversationUseCase, GetOnlineUsersUseCase,
        ListFriendsUseCase, MarkMessageSeenUseCase, PresenceBroadcaster, RelaySignalUseCase,
        SendCallHistoryUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// SendCallHistoryUseCase（通話履歴送信のユースケース）
    pub send_call_history_usecase: Arc<SendCallHistoryUseCase>,
    /// MarkMessageSeenUseCase（既読処理のユースケース）
    pub mark_message_seen_usecase: Arc<MarkMessageSeenUseCase>,
    /// GetConversationUseCase（会話履歴取得のユースケース）
    pub get_conversation_usecase: Arc<GetConversationUseCase>,
    /// GetOnlineUsersUseCase（オンラインユーザー取得のユースケース）
    pub get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
    /// AddFriendUseCase（友達登録のユースケース）
    pub add_friend_usecase: Arc<AddFriendUseCase>,
    /// ListFriendsUseCase（友達一覧取得のユースケース）
    pub list_friends_usecase: Arc<ListFriendsUseCase>,
}

impl AppState {
    /// Wire every usecase on top of the in-memory stores and the WebSocket pusher.
    ///
    /// Dependencies are created in order:
    /// 1. Registry / Repositories
    /// 2. MessagePusher
    /// 3. PresenceBroadcaster / Router
    /// 4. UseCases
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        // 1. Create Registry and Repositories (in-memory)
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let friendships = Arc::new(InMemoryFriendshipRepository::new());

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 3. Create PresenceBroadcaster and Router
        let presence = Arc::new(PresenceBroadcaster::new(
            registry.clone(),
            message_pusher.clone(),
        ));
        let router = Arc::new(EventRouter::new(
            registry.clone(),
            message_pusher.clone(),
            presence.clone(),
        ));

        // 4. Create UseCases
        let delivery = Arc::new(DeliverMessageUseCase::new(
            messages.clone(),
            router.clone(),
            clock.clone(),
        ));

        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
                presence.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                message_pusher,
                presence,
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(router.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                friendships.clone(),
                delivery.clone(),
                clock.clone(),
            )),
            send_call_history_usecase: Arc::new(SendCallHistoryUseCase::new(
                friendships.clone(),
                delivery,
                clock.clone(),
            )),
            mark_message_seen_usecase: Arc::new(MarkMessageSeenUseCase::new(
                messages.clone(),
                router,
                clock,
            )),
            get_conversation_usecase: Arc::new(GetConversationUseCase::new(
                friendships.clone(),
                messages,
            )),
            get_online_users_usecase: Arc::new(GetOnlineUsersUseCase::new(registry)),
            add_friend_usecase: Arc::new(AddFriendUseCase::new(friendships.clone())),
            list_friends_usecase: Arc::new(ListFriendsUseCase::new(friendships)),
        }
    }
}
