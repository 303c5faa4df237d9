use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppPath, AppQuery};
use crate::database::models::{Category, PortfolioFilter, PortfolioProject};
use crate::error::ApiError;
use crate::handlers::Page;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

/// GET /api/portfolio - visible items, optionally by category or featured flag
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PortfolioQuery>,
) -> ApiResult<Vec<PortfolioProject>> {
    let category = query.category.filter(|c| !c.trim().is_empty());
    let items = state
        .store
        .portfolio
        .list(PortfolioFilter::visible(category, query.featured))
        .await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/portfolio/featured?limit=6
pub async fn featured(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<Page>,
) -> ApiResult<Vec<PortfolioProject>> {
    let items = state
        .store
        .portfolio
        .list(PortfolioFilter::featured(query.limit_or(6)))
        .await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/portfolio/categories
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.store.portfolio.categories().await?))
}

/// GET /api/portfolio/category/:category?limit=12
pub async fn by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
    AppQuery(query): AppQuery<Page>,
) -> ApiResult<Vec<PortfolioProject>> {
    let items = state
        .store
        .portfolio
        .list(PortfolioFilter::by_category(category, query.limit_or(12)))
        .await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/portfolio/:id - drafts, archived and scheduled items read as missing
pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<PortfolioProject> {
    state
        .store
        .portfolio
        .find_by_id(id)
        .await?
        .filter(|p| p.is_visible_at(Utc::now()))
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Portfolio project not found"))
}
