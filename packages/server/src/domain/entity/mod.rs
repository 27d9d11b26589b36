//! エンティティ定義

mod call;
mod message;

pub use call::{CallEvent, CallSession, CallSessionBook, CallState};
pub use message::{CallRecord, Message, MessageContent, MessageStatus, StatusChange};
