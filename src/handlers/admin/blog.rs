use axum::extract::State;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath, AppQuery};
use crate::database::models::{slugify, BlogChanges, BlogDraft, BlogFilter, BlogPost, BlogStats};
use crate::error::ApiError;
use crate::handlers::{required, Page};
use crate::middleware::AuthUser;
use crate::state::AppState;

fn slug_for(explicit: Option<&str>, title: &str) -> Result<String, ApiError> {
    let slug = slugify(explicit.filter(|s| !s.trim().is_empty()).unwrap_or(title));
    if slug.is_empty() {
        return Err(ApiError::bad_request("Could not derive a slug; provide one with letters or digits"));
    }
    Ok(slug)
}

/// GET /api/admin/blog?status=&author_id=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<BlogFilter>,
) -> ApiResult<Vec<BlogPost>> {
    Ok(ApiResponse::success(state.store.blog.list(filter).await?))
}

/// GET /api/admin/blog/published?limit=&offset=
pub async fn published(
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

/// GET /api/admin/blog/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<BlogStats> {
    Ok(ApiResponse::success(state.store.blog.stats().await?))
}

/// GET /api/admin/blog/slug/:slug - any status
pub async fn get_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> ApiResult<BlogPost> {
    state
        .store
        .blog
        .find_by_slug(&slug)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}

/// GET /api/admin/blog/:id
pub async fn get(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> ApiResult<BlogPost> {
    state
        .store
        .blog
        .find_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}

/// POST /api/admin/blog - authored by the calling admin; slug derived from the title if omitted
pub async fn create(
    State(state): State<AppState>,
    admin: AuthUser,
    AppJson(mut draft): AppJson<BlogDraft>,
) -> ApiResult<BlogPost> {
    draft.title = required("title", &draft.title)?;
    required("content", &draft.content)?;
    let slug = slug_for(draft.slug.as_deref(), &draft.title)?;

    let post = state.store.blog.create(admin.id, slug, draft).await?;
    Ok(ApiResponse::created(post).with_message("Blog post created successfully"))
}

/// PUT|PATCH /api/admin/blog/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(mut changes): AppJson<BlogChanges>,
) -> ApiResult<BlogPost> {
    let current = state
        .store
        .blog
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    changes.title = changes
        .title
        .as_deref()
        .map(|title| required("title", title))
        .transpose()?;
    if let Some(slug) = changes.slug.take() {
        let title = changes.title.as_deref().unwrap_or(&current.title);
        changes.slug = Some(slug_for(Some(&slug), title)?);
    }

    let post = state.store.blog.update(id, changes).await?;
    Ok(ApiResponse::success(post).with_message("Blog post updated successfully"))
}

/// DELETE /api/admin/blog/:id
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> ApiResult<()> {
    state.store.blog.delete(id).await?;
    Ok(ApiResponse::message("Blog post deleted successfully"))
}
