//! Caller identity for the REST API.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::domain::UserId;

/// Header carrying the user id asserted by the upstream authentication layer
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller of a REST endpoint
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        UserId::new(value.to_string())
            .map(Self)
            .map_err(|_| StatusCode::UNAUTHORIZED)
    }
}
