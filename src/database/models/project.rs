use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ProjectStatus;

/// A client project, owned by the user who created it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub assigned_to: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Admin-side workflow update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStatusChange {
    pub status: ProjectStatus,
    pub assigned_to: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub pending_count: i64,
    pub in_progress_count: i64,
    pub review_count: i64,
    pub completed_count: i64,
    pub cancelled_count: i64,
}
