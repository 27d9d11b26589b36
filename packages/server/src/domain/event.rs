//! Typed real-time events.
//!
//! `Signal` is what a client asks the relay to forward, `ServerEvent` is what
//! the server pushes down a connection. Signaling payloads (SDP, ICE
//! candidates, caller info) are opaque JSON and pass through untouched.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    entity::Message,
    value_object::{CallId, CallType, MessageId, UserId},
};

/// Reason sent back to an inviter whose callee has no connection.
pub const USER_OFFLINE_REASON: &str = "User is offline";

/// Which of the two coexisting signaling flows a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalFlavor {
    /// Direct offer/answer/ICE relay used by the peer-to-peer media path
    Legacy,
    /// Ring/accept/decline handshake in front of the media path
    Invitation,
}

/// A signaling step sent by a client, already stripped of its routing target.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Offer { offer: Value, call_type: CallType },
    Answer { answer: Value },
    IceCandidate { candidate: Value },
    Rejected,
    Ended,
    Invitation {
        call_id: CallId,
        call_type: CallType,
        caller: Value,
    },
    Response { call_id: CallId, accepted: bool },
}

impl Signal {
    pub fn flavor(&self) -> SignalFlavor {
        match self {
            Self::Invitation { .. } | Self::Response { .. } => SignalFlavor::Invitation,
            _ => SignalFlavor::Legacy,
        }
    }

    /// The event the target receives, stamped with the sender's identity.
    pub fn into_event(self, from_user_id: UserId) -> ServerEvent {
        match self {
            Self::Offer { offer, call_type } => ServerEvent::CallOffer {
                from_user_id,
                offer,
                call_type,
            },
            Self::Answer { answer } => ServerEvent::CallAnswer {
                from_user_id,
                answer,
            },
            Self::IceCandidate { candidate } => ServerEvent::IceCandidate {
                from_user_id,
                candidate,
            },
            Self::Rejected => ServerEvent::CallRejected { from_user_id },
            Self::Ended => ServerEvent::CallEnded { from_user_id },
            Self::Invitation {
                call_id,
                call_type,
                caller,
            } => ServerEvent::IncomingCall {
                call_id,
                call_type,
                caller,
                from_user_id,
            },
            Self::Response { call_id, accepted } => ServerEvent::CallResponse {
                call_id,
                accepted,
                from_user_id,
            },
        }
    }
}

/// Every event the server emits.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    OnlineUsers(Vec<UserId>),
    CallOffer {
        from_user_id: UserId,
        offer: Value,
        call_type: CallType,
    },
    CallAnswer {
        from_user_id: UserId,
        answer: Value,
    },
    IceCandidate {
        from_user_id: UserId,
        candidate: Value,
    },
    CallRejected {
        from_user_id: UserId,
    },
    CallEnded {
        from_user_id: UserId,
    },
    IncomingCall {
        call_id: CallId,
        call_type: CallType,
        caller: Value,
        from_user_id: UserId,
    },
    CallFailed {
        reason: String,
    },
    CallResponse {
        call_id: CallId,
        accepted: bool,
        from_user_id: UserId,
    },
    NewMessage(Box<Message>),
    MessageDelivered {
        message_id: MessageId,
        delivered_at: DateTime<Utc>,
    },
    MessageSeen {
        message_id: MessageId,
        seen_at: DateTime<Utc>,
    },
}

impl ServerEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OnlineUsers(_) => "getOnlineUsers",
            Self::CallOffer { .. } => "call-offer",
            Self::CallAnswer { .. } => "call-answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::CallRejected { .. } => "call-rejected",
            Self::CallEnded { .. } => "call-ended",
            Self::IncomingCall { .. } => "incoming-call",
            Self::CallFailed { .. } => "call-failed",
            Self::CallResponse { .. } => "call-response",
            Self::NewMessage(_) => "newMessage",
            Self::MessageDelivered { .. } => "messageDelivered",
            Self::MessageSeen { .. } => "messageSeen",
        }
    }

    pub fn user_offline() -> Self {
        Self::CallFailed {
            reason: USER_OFFLINE_REASON.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signal_flavor() {
        // テスト項目: 招待系とレガシー系のシグナルが区別される
        // given (前提条件):
        let invitation = Signal::Response {
            call_id: CallId::new("c1".to_string()).unwrap(),
            accepted: true,
        };
        let legacy = Signal::IceCandidate {
            candidate: json!({"candidate": "a=1"}),
        };

        // then (期待する結果):
        assert_eq!(invitation.flavor(), SignalFlavor::Invitation);
        assert_eq!(legacy.flavor(), SignalFlavor::Legacy);
    }

    #[test]
    fn test_signal_into_event_attaches_sender() {
        // テスト項目: 転送イベントに送信者の userId が付与され、ペイロードはそのまま渡る
        // given (前提条件):
        let alice = UserId::new("alice".to_string()).unwrap();
        let offer = json!({"type": "offer", "sdp": "v=0"});
        let signal = Signal::Offer {
            offer: offer.clone(),
            call_type: CallType::Video,
        };

        // when (操作):
        let event = signal.into_event(alice.clone());

        // then (期待する結果):
        assert_eq!(event.name(), "call-offer");
        assert_eq!(
            event,
            ServerEvent::CallOffer {
                from_user_id: alice,
                offer,
                call_type: CallType::Video,
            }
        );
    }
}
