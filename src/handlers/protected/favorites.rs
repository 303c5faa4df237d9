use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{Favorite, FavoriteWithProject};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddFavorite {
    #[serde(alias = "projectId")]
    pub project_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
}

/// POST /api/favorites - 409 when already saved, 404 for an unknown or unpublished portfolio project
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<AddFavorite>,
) -> ApiResult<Favorite> {
    let visible = state
        .store
        .portfolio
        .find_by_id(body.project_id)
        .await?
        .is_some_and(|p| p.is_visible_at(Utc::now()));
    if !visible {
        return Err(ApiError::not_found("Portfolio project not found"));
    }

    let favorite = state
        .store
        .favorites
        .add(user.id, body.project_id)
        .await
        .map_err(ApiError::from)
        .map_err(|e| match e {
            ApiError::Conflict(_) => ApiError::conflict("Favorite already exists"),
            ApiError::NotFound(_) => ApiError::not_found("Portfolio project not found"),
            other => other,
        })?;
    Ok(ApiResponse::created(favorite).with_message("Favorite added successfully"))
}

/// GET /api/favorites - with the portfolio project summary
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<FavoriteWithProject>> {
    Ok(ApiResponse::success(state.store.favorites.find_by_owner(user.id).await?))
}

/// GET /api/favorites/check/:projectId
pub async fn check(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(project_id): AppPath<i64>,
) -> ApiResult<FavoriteCheck> {
    let is_favorite = state.store.favorites.exists(user.id, project_id).await?;
    Ok(ApiResponse::success(FavoriteCheck { is_favorite }))
}

/// DELETE /api/favorites/:projectId - only ever touches the caller's own row
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(project_id): AppPath<i64>,
) -> ApiResult<()> {
    if !state.store.favorites.remove(user.id, project_id).await? {
        return Err(ApiError::not_found("Favorite not found"));
    }
    Ok(ApiResponse::message("Favorite removed successfully"))
}
