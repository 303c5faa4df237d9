use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{NewProject, Project, ProjectChanges};
use crate::error::ApiError;
use crate::handlers::protected::owned;
use crate::handlers::required;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Create body. An owner field in the request is not read.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

async fn load(state: &AppState, user: &AuthUser, id: i64) -> Result<Project, ApiError> {
    let project = state.store.projects.find_by_id(id).await?;
    owned(user, project, |p| p.user_id, "Project")
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateProject>,
) -> ApiResult<Project> {
    let project = state
        .store
        .projects
        .create(NewProject {
            user_id: user.id,
            title: required("title", &body.title)?,
            description: body.description,
            image: body.image,
        })
        .await?;
    Ok(ApiResponse::created(project).with_message("Project created successfully"))
}

/// GET /api/projects - the caller's own projects
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Project>> {
    Ok(ApiResponse::success(state.store.projects.find_by_owner(user.id).await?))
}

/// GET /api/projects/:id
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Project> {
    Ok(ApiResponse::success(load(&state, &user, id).await?))
}

/// PUT|PATCH /api/projects/:id - title, description, image
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(changes): AppJson<ProjectChanges>,
) -> ApiResult<Project> {
    load(&state, &user, id).await?;
    if let Some(title) = &changes.title {
        required("title", title)?;
    }
    let project = state.store.projects.update(id, changes).await?;
    Ok(ApiResponse::success(project).with_message("Project updated successfully"))
}

/// DELETE /api/projects/:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<()> {
    load(&state, &user, id).await?;
    state.store.projects.delete(id).await?;
    Ok(ApiResponse::message("Project deleted successfully"))
}
