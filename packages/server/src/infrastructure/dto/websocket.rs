//! WebSocket event DTOs.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{CallId, CallType, UserId};

/// Envelope of a frame pushed to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireEvent {
    pub event: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallOfferPayload {
    pub from_user_id: String,
    pub offer: Value,
    pub call_type: CallType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallAnswerPayload {
    pub from_user_id: String,
    pub answer: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidatePayload {
    pub from_user_id: String,
    pub candidate: Value,
}

/// Payload of `call-rejected` and `call-ended`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FromUserPayload {
    pub from_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingCallPayload {
    pub call_id: String,
    pub call_type: CallType,
    pub caller: Value,
    pub from_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallFailedPayload {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallResponsePayload {
    pub call_id: String,
    pub accepted: bool,
    pub from_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeliveredPayload {
    pub message_id: String,
    pub status: String,
    pub delivered_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSeenPayload {
    pub message_id: String,
    pub status: String,
    pub seen_at: String,
}

/// Signaling event sent by a client.
///
/// Each carries the `targetUserId` used for routing. A frame that does not
/// parse (unknown event, missing target) is dropped by the handler.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    CallOffer {
        target_user_id: UserId,
        offer: Value,
        call_type: CallType,
    },
    #[serde(rename_all = "camelCase")]
    CallAnswer {
        target_user_id: UserId,
        answer: Value,
    },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        target_user_id: UserId,
        candidate: Value,
    },
    #[serde(rename_all = "camelCase")]
    CallRejected { target_user_id: UserId },
    #[serde(rename_all = "camelCase")]
    CallEnded { target_user_id: UserId },
    #[serde(rename_all = "camelCase")]
    CallInvitation {
        target_user_id: UserId,
        call_id: CallId,
        call_type: CallType,
        #[serde(default)]
        caller_info: Option<Value>,
    },
    #[serde(rename_all = "camelCase")]
    CallResponse {
        target_user_id: UserId,
        call_id: CallId,
        accepted: bool,
    },
}
