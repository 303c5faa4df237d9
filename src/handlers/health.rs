use axum::Json;
use serde_json::{json, Value};

/// GET /health, GET /api/health - liveness only, does not touch the store
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running"
    }))
}
