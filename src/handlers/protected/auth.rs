use axum::extract::State;

use crate::api::{ApiResponse, ApiResult, AppJson};
use crate::database::models::{ProfileChanges, User};
use crate::error::ApiError;
use crate::handlers::public::auth::AuthPayload;
use crate::middleware::AuthUser;
use crate::state::AppState;

async fn current(state: &AppState, user: &AuthUser) -> Result<User, ApiError> {
    state
        .store
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /api/auth/profile
pub async fn profile(State(state): State<AppState>, user: AuthUser) -> ApiResult<User> {
    Ok(ApiResponse::success(current(&state, &user).await?))
}

/// PATCH /api/auth/profile - `{name?, avatar?}`; email and role are not editable here
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(changes): AppJson<ProfileChanges>,
) -> ApiResult<User> {
    if changes.name.as_deref().map_or(false, |n| n.trim().is_empty()) {
        return Err(ApiError::bad_request("name cannot be empty"));
    }
    let changes = ProfileChanges {
        name: changes.name.map(|n| n.trim().to_string()),
        avatar: changes.avatar,
    };

    let updated = state.store.users.update_profile(user.id, changes).await?;
    Ok(ApiResponse::success(updated).with_message("Profile updated successfully"))
}

/// POST /api/auth/refresh - new token for the caller's current identity
pub async fn refresh(State(state): State<AppState>, user: AuthUser) -> ApiResult<AuthPayload> {
    let current = current(&state, &user).await?;
    tracing::debug!("Refreshing token for user {}", current.id);
    Ok(ApiResponse::success(AuthPayload::issue(&state, current)?))
}
