use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath, AppQuery};
use crate::database::models::{ContactChanges, ContactStats, ContactSubmission};
use crate::error::ApiError;
use crate::handlers::{required, valid_email, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    #[serde(default, alias = "reply_message")]
    pub reply: String,
}

/// GET /api/admin/contacts?limit=50&offset=0
pub async fn list(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> ApiResult<Vec<ContactSubmission>> {
    let submissions = state
        .store
        .contacts
        .list(page.limit_or(50), page.offset())
        .await?;
    Ok(ApiResponse::success(submissions))
}

/// GET /api/admin/contacts/statistics
pub async fn statistics(State(state): State<AppState>) -> ApiResult<ContactStats> {
    Ok(ApiResponse::success(state.store.contacts.statistics().await?))
}

/// GET /api/admin/contacts/:id
pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<ContactSubmission> {
    state
        .store
        .contacts
        .find_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Contact submission not found"))
}

/// PUT|PATCH /api/admin/contacts/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(mut changes): AppJson<ContactChanges>,
) -> ApiResult<ContactSubmission> {
    changes.name = changes.name.as_deref().map(|v| required("name", v)).transpose()?;
    changes.email = changes.email.as_deref().map(valid_email).transpose()?;
    changes.message = changes
        .message
        .as_deref()
        .map(|v| required("message", v))
        .transpose()?;

    let submission = state.store.contacts.update(id, changes).await?;
    Ok(ApiResponse::success(submission).with_message("Contact submission updated successfully"))
}

/// PUT|PATCH /api/admin/contacts/:id/reply - records the reply and marks it replied
pub async fn reply(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<ReplyRequest>,
) -> ApiResult<ContactSubmission> {
    let reply = required("reply", &body.reply)?;
    let submission = state.store.contacts.reply(id, reply).await?;
    Ok(ApiResponse::success(submission).with_message("Reply saved successfully"))
}

/// PUT|PATCH /api/admin/contacts/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<ContactSubmission> {
    let submission = state.store.contacts.mark_read(id).await?;
    Ok(ApiResponse::success(submission).with_message("Contact submission marked as read"))
}

/// DELETE /api/admin/contacts/:id
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> ApiResult<()> {
    state.store.contacts.delete(id).await?;
    Ok(ApiResponse::message("Contact submission deleted successfully"))
}
