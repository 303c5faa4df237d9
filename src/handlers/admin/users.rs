use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath, AppQuery};
use crate::database::models::{User, UserFilter, UserStats};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BanRequest {
    pub reason: Option<String>,
}

/// GET /api/admin/users?role=&is_active=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<UserFilter>,
) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.store.users.list(filter).await?))
}

/// GET /api/admin/users/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<UserStats> {
    Ok(ApiResponse::success(state.store.users.stats().await?))
}

/// PUT|PATCH /api/admin/users/:id/role
pub async fn update_role(
    State(state): State<AppState>,
    admin: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<RoleChange>,
) -> ApiResult<User> {
    let role: Role = body
        .role
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid role. Must be admin, team, or client"))?;
    if id == admin.id && role != Role::Admin {
        return Err(ApiError::bad_request("You cannot remove your own admin role"));
    }

    let user = state.store.users.update_role(id, role).await?;
    tracing::info!("Admin {} set role of user {} to {}", admin.id, id, role);
    Ok(ApiResponse::success(user).with_message("User role updated successfully"))
}

/// PUT|PATCH /api/admin/users/:id/ban - `{reason}`
pub async fn ban(
    State(state): State<AppState>,
    admin: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<BanRequest>,
) -> ApiResult<User> {
    let reason = body
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::bad_request("Ban reason is required"))?;
    if id == admin.id {
        return Err(ApiError::bad_request("You cannot ban your own account"));
    }

    let user = state.store.users.ban(id, reason).await?;
    tracing::info!("Admin {} banned user {}", admin.id, id);
    Ok(ApiResponse::success(user).with_message("User banned successfully"))
}

/// PUT|PATCH /api/admin/users/:id/unban
pub async fn unban(
    State(state): State<AppState>,
    admin: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<User> {
    let user = state.store.users.unban(id).await?;
    tracing::info!("Admin {} unbanned user {}", admin.id, id);
    Ok(ApiResponse::success(user).with_message("User unbanned successfully"))
}
