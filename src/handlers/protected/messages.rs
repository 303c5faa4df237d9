use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{Message, NewMessage};
use crate::error::ApiError;
use crate::handlers::protected::owned;
use crate::handlers::required;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::MessageType;

#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: i64,
}

async fn load(state: &AppState, user: &AuthUser, id: i64) -> Result<Message, ApiError> {
    let message = state.store.messages.find_by_id(id).await?;
    owned(user, message, |m| m.user_id, "Message")
}

/// POST /api/messages - a note from the caller to the studio, kept in the caller's thread
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateMessage>,
) -> ApiResult<Message> {
    let message = state
        .store
        .messages
        .create(NewMessage {
            user_id: user.id,
            sender_id: Some(user.id),
            title: required("title", &body.title)?,
            content: required("content", &body.content)?,
            message_type: MessageType::UserToAdmin,
        })
        .await?;
    Ok(ApiResponse::created(message).with_message("Message created successfully"))
}

/// GET /api/messages
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Message>> {
    Ok(ApiResponse::success(state.store.messages.find_by_owner(user.id).await?))
}

/// GET /api/messages/unread-count
pub async fn unread_count(State(state): State<AppState>, user: AuthUser) -> ApiResult<UnreadCount> {
    let unread_count = state.store.messages.unread_count(user.id).await?;
    Ok(ApiResponse::success(UnreadCount { unread_count }))
}

/// GET /api/messages/:id
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Message> {
    Ok(ApiResponse::success(load(&state, &user, id).await?))
}

/// PUT|PATCH /api/messages/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Message> {
    load(&state, &user, id).await?;
    let message = state.store.messages.mark_read(id).await?;
    Ok(ApiResponse::success(message).with_message("Message marked as read"))
}

/// DELETE /api/messages/:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<()> {
    load(&state, &user, id).await?;
    state.store.messages.delete(id).await?;
    Ok(ApiResponse::message("Message deleted successfully"))
}
