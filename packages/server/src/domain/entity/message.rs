//! Message entity and its three-state delivery status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    error::{StatusTransitionError, ValueObjectError},
    value_object::{CallId, CallType, MessageId, UserId},
};

/// Delivery status of a message. Ordered: `Sent < Delivered < Seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Seen,
}

/// Outcome of a status update that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The status moved forward and the matching timestamp was recorded.
    Advanced,
    /// The message was already in the requested status.
    Unchanged,
}

/// Body of a message: text, an already-uploaded image URL, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent {
    text: Option<String>,
    image: Option<String>,
}

impl MessageContent {
    pub fn new(text: Option<String>, image: Option<String>) -> Result<Self, ValueObjectError> {
        let text = text.filter(|t| !t.trim().is_empty());
        let image = image.filter(|i| !i.trim().is_empty());
        if text.is_none() && image.is_none() {
            return Err(ValueObjectError::Empty("text or image"));
        }
        Ok(Self { text, image })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Call that a call-history message refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub call_id: CallId,
    pub call_type: CallType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: MessageContent,
    /// Set only for call-history messages
    pub call: Option<CallRecord>,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub seen_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a freshly sent message.
    pub fn new(
        sender_id: UserId,
        receiver_id: UserId,
        content: MessageContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id,
            receiver_id,
            content,
            call: None,
            status: MessageStatus::Sent,
            created_at,
            delivered_at: None,
            seen_at: None,
        }
    }

    /// Create the message left behind after a call ends.
    pub fn call_history(
        sender_id: UserId,
        receiver_id: UserId,
        call: CallRecord,
        created_at: DateTime<Utc>,
    ) -> Self {
        let content = MessageContent {
            text: Some(call.call_type.history_text().to_string()),
            image: None,
        };
        Self {
            call: Some(call),
            ..Self::new(sender_id, receiver_id, content, created_at)
        }
    }

    pub fn is_call_history(&self) -> bool {
        self.call.is_some()
    }

    /// Move the status forward to `to`, recording its timestamp the first time.
    ///
    /// Moving backward is rejected and leaves the message untouched.
    pub fn advance_status(
        &mut self,
        to: MessageStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusChange, StatusTransitionError> {
        if to < self.status {
            return Err(StatusTransitionError {
                from: self.status,
                to,
            });
        }
        if to == self.status {
            return Ok(StatusChange::Unchanged);
        }

        self.status = to;
        match to {
            MessageStatus::Delivered => {
                self.delivered_at.get_or_insert(at);
            }
            MessageStatus::Seen => {
                self.seen_at.get_or_insert(at);
            }
            MessageStatus::Sent => {}
        }
        Ok(StatusChange::Advanced)
    }
}
