use std::collections::HashMap;

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{ApiResponse, ApiResult, AppJson, AppPath};
use crate::database::models::{settings_object, Setting};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettingUpdate {
    pub value: Option<Value>,
}

/// Values are stored as text; strings go in verbatim, anything else as its JSON form.
fn stored_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// GET /api/admin/settings
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Setting>> {
    Ok(ApiResponse::success(state.store.settings.list().await?))
}

/// GET /api/admin/settings/object - `{key: parsed value}`
pub async fn object(State(state): State<AppState>) -> ApiResult<Map<String, Value>> {
    let settings = state.store.settings.list().await?;
    Ok(ApiResponse::success(settings_object(&settings)))
}

/// PUT|PATCH /api/admin/settings/:key - `{value}`
pub async fn update(
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
    AppJson(body): AppJson<SettingUpdate>,
) -> ApiResult<Setting> {
    let value = match body.value {
        None | Some(Value::Null) => return Err(ApiError::bad_request("Value is required")),
        Some(value) => stored_text(value),
    };
    let setting = state.store.settings.update(&key, value).await?;
    Ok(ApiResponse::success(setting).with_message("Setting updated successfully"))
}

/// PUT|PATCH /api/admin/settings - `{key: value, ...}`, all or nothing
pub async fn update_many(
    State(state): State<AppState>,
    AppJson(body): AppJson<HashMap<String, Value>>,
) -> ApiResult<Vec<Setting>> {
    if body.is_empty() {
        return Err(ApiError::bad_request("Settings object is required"));
    }
    if let Some((key, _)) = body.iter().find(|(_, v)| v.is_null()) {
        return Err(ApiError::bad_request(format!("Value for '{}' is required", key)));
    }

    let values = body.into_iter().map(|(k, v)| (k, stored_text(v))).collect();
    let settings = state.store.settings.update_many(values).await?;
    Ok(ApiResponse::success(settings).with_message("Settings updated successfully"))
}
