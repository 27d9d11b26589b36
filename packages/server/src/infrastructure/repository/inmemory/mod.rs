//! インメモリ実装
//!
//! プロセス内の HashMap をストレージとして使用します。レプリケーションはしません。

mod connection;
mod friendship;
mod message;

pub use connection::InMemoryConnectionRegistry;
pub use friendship::InMemoryFriendshipRepository;
pub use message::InMemoryMessageRepository;
