use axum::extract::State;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Order, OrderStats};
use crate::state::AppState;

/// GET /api/admin/orders
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    Ok(ApiResponse::success(state.store.orders.list_all().await?))
}

/// GET /api/admin/orders/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<OrderStats> {
    Ok(ApiResponse::success(state.store.orders.stats().await?))
}
