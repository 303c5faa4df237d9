use axum::extract::State;
use chrono::Utc;

use crate::api::{ApiResponse, ApiResult, AppPath, AppQuery};
use crate::database::models::BlogPost;
use crate::error::ApiError;
use crate::handlers::Page;
use crate::state::AppState;

/// GET /api/blog?limit=&offset= - published posts, newest first
pub async fn list(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> ApiResult<Vec<BlogPost>> {
    let posts = state
        .store
        .blog
        .published(page.limit_or(10), page.offset())
        .await?;
    Ok(ApiResponse::success(posts))
}

/// GET /api/blog/:slug
pub async fn get_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> ApiResult<BlogPost> {
    state
        .store
        .blog
        .find_by_slug(&slug)
        .await?
        .filter(|post| post.is_visible_at(Utc::now()))
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}
