use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson};
use crate::database::models::{Message, MessageStats, MessageWithUsers, NewMessage};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::MessageType;

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// GET /api/admin/messages - every inbox, with sender and recipient emails
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MessageWithUsers>> {
    Ok(ApiResponse::success(state.store.messages.list_all().await?))
}

/// GET /api/admin/messages/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<MessageStats> {
    Ok(ApiResponse::success(state.store.messages.stats().await?))
}

/// POST /api/admin/messages/send - drop a message into a user's inbox
pub async fn send(
    State(state): State<AppState>,
    admin: AuthUser,
    AppJson(body): AppJson<SendMessage>,
) -> ApiResult<Message> {
    let user_id = body
        .user_id
        .ok_or_else(|| ApiError::bad_request("user_id, title, and content are required"))?;
    let message = state
        .store
        .messages
        .create(NewMessage {
            user_id,
            sender_id: Some(admin.id),
            title: required("title", &body.title)?,
            content: required("content", &body.content)?,
            message_type: MessageType::AdminToUser,
        })
        .await
        .map_err(ApiError::from)
        .map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::not_found("Recipient not found"),
            other => other,
        })?;
    Ok(ApiResponse::created(message).with_message("Message sent successfully"))
}
