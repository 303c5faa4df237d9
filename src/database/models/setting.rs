use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::types::SettingType;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub setting_type: SettingType,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Parse the stored string by its type tag. Numbers and JSON that fail to
    /// parse come back as the raw string.
    pub fn parsed_value(&self) -> Value {
        let raw = || Value::String(self.value.clone());
        match self.setting_type {
            SettingType::String => raw(),
            SettingType::Boolean => Value::Bool(self.value.trim().eq_ignore_ascii_case("true")),
            SettingType::Number => self
                .value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(raw),
            SettingType::Json => serde_json::from_str(&self.value).unwrap_or_else(|_| raw()),
        }
    }
}

/// Flatten settings into `{key: parsed value}`.
pub fn settings_object(settings: &[Setting]) -> Map<String, Value> {
    settings
        .iter()
        .map(|s| (s.key.clone(), s.parsed_value()))
        .collect()
}
