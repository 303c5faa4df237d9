use axum::extract::State;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{PortfolioChanges, PortfolioDraft, PortfolioFilter, PortfolioProject};
use crate::handlers::required;
use crate::state::AppState;

/// GET /api/admin/portfolio - every item, drafts and archived included
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PortfolioProject>> {
    let items = state
        .store
        .portfolio
        .list(PortfolioFilter::default())
        .await?;
    Ok(ApiResponse::success(items))
}

/// POST /api/admin/portfolio
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut draft): AppJson<PortfolioDraft>,
) -> ApiResult<PortfolioProject> {
    draft.title = required("title", &draft.title)?;
    let item = state.store.portfolio.create(draft).await?;
    tracing::info!("Portfolio project {} created", item.id);
    Ok(ApiResponse::created(item).with_message("Portfolio project created successfully"))
}

/// PUT|PATCH /api/admin/portfolio/:id
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(mut changes): AppJson<PortfolioChanges>,
) -> ApiResult<PortfolioProject> {
    changes.title = changes
        .title
        .as_deref()
        .map(|title| required("title", title))
        .transpose()?;
    let item = state.store.portfolio.update(id, changes).await?;
    Ok(ApiResponse::success(item).with_message("Portfolio project updated successfully"))
}

/// DELETE /api/admin/portfolio/:id - favorites of it go too, orders keep a null reference
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> ApiResult<()> {
    state.store.portfolio.delete(id).await?;
    Ok(ApiResponse::message("Portfolio project deleted successfully"))
}
