//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    add_friend, get_conversation, get_online_users, health_check, list_friends,
    mark_message_seen, send_call_history, send_message,
};
pub use websocket::websocket_handler;
