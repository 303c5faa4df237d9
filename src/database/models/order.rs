use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::OrderStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub amount: f64,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub pending_orders: i64,
    pub processing_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
}
