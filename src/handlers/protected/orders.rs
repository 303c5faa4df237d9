use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{NewOrder, Order};
use crate::error::ApiError;
use crate::handlers::protected::owned;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    #[serde(alias = "projectId")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

async fn load(state: &AppState, user: &AuthUser, id: i64) -> Result<Order, ApiError> {
    let order = state.store.orders.find_by_id(id).await?;
    owned(user, order, |o| o.user_id, "Order")
}

/// POST /api/orders - `project_id`, when given, must name a portfolio project
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateOrder>,
) -> ApiResult<Order> {
    if !body.amount.is_finite() || body.amount < 0.0 {
        return Err(ApiError::bad_request("amount must be a non-negative number"));
    }
    let order = state
        .store
        .orders
        .create(NewOrder {
            user_id: user.id,
            project_id: body.project_id,
            amount: body.amount,
            details: body.details,
        })
        .await?;
    Ok(ApiResponse::created(order).with_message("Order created successfully"))
}

/// GET /api/orders
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Order>> {
    Ok(ApiResponse::success(state.store.orders.find_by_owner(user.id).await?))
}

/// GET /api/orders/:id
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Order> {
    Ok(ApiResponse::success(load(&state, &user, id).await?))
}

/// PUT|PATCH /api/orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<StatusUpdate>,
) -> ApiResult<Order> {
    load(&state, &user, id).await?;
    let order = state.store.orders.update_status(id, body.status).await?;
    Ok(ApiResponse::success(order).with_message("Order status updated successfully"))
}

/// DELETE /api/orders/:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> ApiResult<()> {
    load(&state, &user, id).await?;
    state.store.orders.delete(id).await?;
    Ok(ApiResponse::message("Order deleted successfully"))
}
