//! Conversion logic between DTOs and domain entities.

use serde::Serialize;
use serde_json::Value;

use linkclub_shared::time::to_wire_timestamp;

use crate::domain::{Message, MessageStatus, ServerEvent, Signal, UserId};

use super::{
    http::MessageDto,
    websocket::{
        CallAnswerPayload, CallFailedPayload, CallOfferPayload, CallResponsePayload, ClientEvent,
        FromUserPayload, IceCandidatePayload, IncomingCallPayload, MessageDeliveredPayload,
        MessageSeenPayload, WireEvent,
    },
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for MessageDto {
    fn from(model: &Message) -> Self {
        Self {
            id: model.id.to_string(),
            sender_id: model.sender_id.as_str().to_string(),
            receiver_id: model.receiver_id.as_str().to_string(),
            text: model.content.text().map(str::to_string),
            image: model.content.image().map(str::to_string),
            status: status_name(model.status).to_string(),
            is_call_history: model.is_call_history(),
            call_id: model.call.as_ref().map(|c| c.call_id.as_str().to_string()),
            call_type: model.call.as_ref().map(|c| c.call_type),
            created_at: to_wire_timestamp(&model.created_at),
            delivered_at: model.delivered_at.as_ref().map(to_wire_timestamp),
            seen_at: model.seen_at.as_ref().map(to_wire_timestamp),
        }
    }
}

fn status_name(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Sent => "sent",
        MessageStatus::Delivered => "delivered",
        MessageStatus::Seen => "seen",
    }
}

fn to_value<T: Serialize>(payload: T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(payload)
}

impl TryFrom<&ServerEvent> for WireEvent {
    type Error = serde_json::Error;

    fn try_from(event: &ServerEvent) -> Result<Self, Self::Error> {
        let data = match event {
            ServerEvent::OnlineUsers(users) => {
                to_value(users.iter().map(UserId::as_str).collect::<Vec<_>>())?
            }
            ServerEvent::CallOffer {
                from_user_id,
                offer,
                call_type,
            } => to_value(CallOfferPayload {
                from_user_id: from_user_id.to_string(),
                offer: offer.clone(),
                call_type: *call_type,
            })?,
            ServerEvent::CallAnswer {
                from_user_id,
                answer,
            } => to_value(CallAnswerPayload {
                from_user_id: from_user_id.to_string(),
                answer: answer.clone(),
            })?,
            ServerEvent::IceCandidate {
                from_user_id,
                candidate,
            } => to_value(IceCandidatePayload {
                from_user_id: from_user_id.to_string(),
                candidate: candidate.clone(),
            })?,
            ServerEvent::CallRejected { from_user_id } | ServerEvent::CallEnded { from_user_id } => {
                to_value(FromUserPayload {
                    from_user_id: from_user_id.to_string(),
                })?
            }
            ServerEvent::IncomingCall {
                call_id,
                call_type,
                caller,
                from_user_id,
            } => to_value(IncomingCallPayload {
                call_id: call_id.as_str().to_string(),
                call_type: *call_type,
                caller: caller.clone(),
                from_user_id: from_user_id.to_string(),
            })?,
            ServerEvent::CallFailed { reason } => to_value(CallFailedPayload {
                reason: reason.clone(),
            })?,
            ServerEvent::CallResponse {
                call_id,
                accepted,
                from_user_id,
            } => to_value(CallResponsePayload {
                call_id: call_id.as_str().to_string(),
                accepted: *accepted,
                from_user_id: from_user_id.to_string(),
            })?,
            ServerEvent::NewMessage(message) => to_value(MessageDto::from(message.as_ref()))?,
            ServerEvent::MessageDelivered {
                message_id,
                delivered_at,
            } => to_value(MessageDeliveredPayload {
                message_id: message_id.to_string(),
                status: "delivered".to_string(),
                delivered_at: to_wire_timestamp(delivered_at),
            })?,
            ServerEvent::MessageSeen {
                message_id,
                seen_at,
            } => to_value(MessageSeenPayload {
                message_id: message_id.to_string(),
                status: "seen".to_string(),
                seen_at: to_wire_timestamp(seen_at),
            })?,
        };

        Ok(Self {
            event: event.name().to_string(),
            data,
        })
    }
}

/// Encode an event into the text frame sent down a WebSocket.
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireEvent::try_from(event)?)
}

// ========================================
// DTO → Domain
// ========================================

impl ClientEvent {
    /// Split into the routing target and the signal to relay.
    pub fn into_signal(self) -> (UserId, Signal) {
        match self {
            Self::CallOffer {
                target_user_id,
                offer,
                call_type,
            } => (target_user_id, Signal::Offer { offer, call_type }),
            Self::CallAnswer {
                target_user_id,
                answer,
            } => (target_user_id, Signal::Answer { answer }),
            Self::IceCandidate {
                target_user_id,
                candidate,
            } => (target_user_id, Signal::IceCandidate { candidate }),
            Self::CallRejected { target_user_id } => (target_user_id, Signal::Rejected),
            Self::CallEnded { target_user_id } => (target_user_id, Signal::Ended),
            Self::CallInvitation {
                target_user_id,
                call_id,
                call_type,
                caller_info,
            } => (
                target_user_id,
                Signal::Invitation {
                    call_id,
                    call_type,
                    caller: caller_info.unwrap_or(Value::Null),
                },
            ),
            Self::CallResponse {
                target_user_id,
                call_id,
                accepted,
            } => (target_user_id, Signal::Response { call_id, accepted }),
        }
    }
}
