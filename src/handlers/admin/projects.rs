use axum::extract::State;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath, AppQuery};
use crate::database::models::{Project, ProjectFilter, ProjectStats, ProjectStatusChange};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/projects?status=&assigned_to=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ProjectFilter>,
) -> ApiResult<Vec<Project>> {
    Ok(ApiResponse::success(state.store.projects.list(filter).await?))
}

/// GET /api/admin/projects/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<ProjectStats> {
    Ok(ApiResponse::success(state.store.projects.stats().await?))
}

/// PUT|PATCH /api/admin/projects/:id/status - status plus optional assignee and deadline
pub async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(change): AppJson<ProjectStatusChange>,
) -> ApiResult<Project> {
    if let Some(assignee) = change.assigned_to {
        if state.store.users.find_by_id(assignee).await?.is_none() {
            return Err(ApiError::bad_request(format!("Assignee {} does not exist", assignee)));
        }
    }
    let project = state.store.projects.update_status(id, change).await?;
    Ok(ApiResponse::success(project).with_message("Project status updated successfully"))
}
