//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{CallId, CallRecord, MessageId, RepositoryError, UserId},
    infrastructure::dto::http::{
        CallHistoryRequest, ErrorResponse, FriendDto, MessageDto, SendMessageRequest,
        SuccessResponse,
    },
    ui::{auth::AuthenticatedUser, state::AppState},
    usecase::{AddFriendError, GetConversationError, MarkSeenError, SendMessageError},
};

/// エラーレスポンス（ステータスコード + `{"error": ...}`）
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn repository(e: RepositoryError) -> Self {
        tracing::warn!("Repository failure: {}", e);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<SendMessageError> for ApiError {
    fn from(e: SendMessageError) -> Self {
        match e {
            SendMessageError::NotFriends => Self::new(StatusCode::FORBIDDEN, e.to_string()),
            SendMessageError::InvalidInput(_) => Self::bad_request(e.to_string()),
            SendMessageError::Repository(e) => Self::repository(e),
        }
    }
}

impl From<MarkSeenError> for ApiError {
    fn from(e: MarkSeenError) -> Self {
        match e {
            MarkSeenError::MessageNotFound => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            MarkSeenError::NotReceiver => Self::new(StatusCode::FORBIDDEN, e.to_string()),
            MarkSeenError::Repository(e) => Self::repository(e),
        }
    }
}

impl From<GetConversationError> for ApiError {
    fn from(e: GetConversationError) -> Self {
        match e {
            GetConversationError::NotFriends => Self::new(StatusCode::FORBIDDEN, e.to_string()),
            GetConversationError::Repository(e) => Self::repository(e),
        }
    }
}

impl From<AddFriendError> for ApiError {
    fn from(e: AddFriendError) -> Self {
        match e {
            AddFriendError::SelfFriendship => Self::bad_request(e.to_string()),
            AddFriendError::Repository(e) => Self::repository(e),
        }
    }
}

fn parse_user_id(raw: String) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current registry key set
pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let online = state.get_online_users_usecase.execute().await;
    Json(online.into_iter().map(UserId::into_string).collect())
}

/// `POST /api/messages/send/{receiverId}`
pub async fn send_message(
    AuthenticatedUser(sender_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(receiver_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let receiver_id = parse_user_id(receiver_id)?;
    let message = state
        .send_message_usecase
        .execute(sender_id, receiver_id, request.text, request.image)
        .await?;

    // Domain Model から DTO への変換
    Ok((StatusCode::CREATED, Json(MessageDto::from(&message))))
}

/// `POST /api/messages/call-history`
pub async fn send_call_history(
    AuthenticatedUser(sender_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallHistoryRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let receiver_id = request
        .receiver_id
        .ok_or_else(|| ApiError::bad_request("Receiver ID is required"))
        .and_then(parse_user_id)?;
    let call_id = CallId::new(request.call_id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let call = CallRecord {
        call_id,
        call_type: request.call_type,
    };

    let message = state
        .send_call_history_usecase
        .execute(sender_id, receiver_id, call)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageDto::from(&message))))
}

/// `PATCH /api/messages/seen/{messageId}`
pub async fn mark_message_seen(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let message_id =
        MessageId::parse(&message_id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    state
        .mark_message_seen_usecase
        .execute(&caller, &message_id)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/messages/users`
pub async fn list_friends(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FriendDto>>, ApiError> {
    let friends = state
        .list_friends_usecase
        .execute(&caller)
        .await
        .map_err(ApiError::repository)?;
    Ok(Json(
        friends
            .into_iter()
            .map(|id| FriendDto {
                id: id.into_string(),
            })
            .collect(),
    ))
}

/// `GET /api/messages/{userId}`
pub async fn get_conversation(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<String>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let peer_id = parse_user_id(peer_id)?;
    let messages = state
        .get_conversation_usecase
        .execute(&caller, &peer_id)
        .await?;
    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// `POST /api/friends/{userId}`
pub async fn add_friend(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(friend_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let friend_id = parse_user_id(friend_id)?;
    state.add_friend_usecase.execute(&caller, &friend_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
