use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A (user, portfolio project) bookmark. The pair is unique.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteWithProject {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub favorite: Favorite,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}
