use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ContentStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PortfolioProject {
    pub id: i64,
    pub title: String,
    pub client: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub featured: bool,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PortfolioProject {
    /// Publicly visible: published, and its scheduled time (if any) has passed.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ContentStatus::Published && self.published_at.map_or(true, |at| at <= now)
    }
}

fn default_portfolio_status() -> ContentStatus {
    ContentStatus::Published
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioDraft {
    pub title: String,
    pub client: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_portfolio_status")]
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioChanges {
    pub title: Option<String>,
    pub client: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ContentStatus>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub published_only: bool,
    pub limit: Option<i64>,
}

impl PortfolioFilter {
    /// Public listing: visible items only.
    pub fn visible(category: Option<String>, featured: Option<bool>) -> Self {
        Self {
            category,
            featured,
            published_only: true,
            limit: None,
        }
    }

    pub fn featured(limit: i64) -> Self {
        Self {
            featured: Some(true),
            limit: Some(limit),
            ..Self::visible(None, None)
        }
    }

    pub fn by_category(category: String, limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::visible(Some(category), None)
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
