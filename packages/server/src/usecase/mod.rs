//! UseCase 層
//!
//! 接続・切断、プレゼンス通知、シグナリング中継、メッセージ配送と既読処理を提供します。

pub mod add_friend;
pub mod announce_presence;
pub mod connect_participant;
pub mod deliver_message;
pub mod disconnect_participant;
pub mod error;
pub mod get_conversation;
pub mod get_online_users;
pub mod list_friends;
pub mod mark_message_seen;
pub mod relay_signal;
pub mod route_event;
pub mod send_call_history;
pub mod send_message;

pub use add_friend::AddFriendUseCase;
pub use announce_presence::{PresenceBroadcaster, PresenceChange};
pub use connect_participant::{ConnectParticipantUseCase, Connected};
pub use deliver_message::DeliverMessageUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{AddFriendError, GetConversationError, MarkSeenError, SendMessageError};
pub use get_conversation::GetConversationUseCase;
pub use get_online_users::GetOnlineUsersUseCase;
pub use list_friends::ListFriendsUseCase;
pub use mark_message_seen::MarkMessageSeenUseCase;
pub use relay_signal::{RelayOutcome, RelaySignalUseCase};
pub use route_event::{EventRouter, RouteOutcome};
pub use send_call_history::SendCallHistoryUseCase;
pub use send_message::SendMessageUseCase;
