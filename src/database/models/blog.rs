use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ContentStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub author_name: Option<String>,
}

impl BlogPost {
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ContentStatus::Published && self.published_at.map_or(true, |at| at <= now)
    }
}

fn default_blog_status() -> ContentStatus {
    ContentStatus::Draft
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default = "default_blog_status")]
    pub status: ContentStatus,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<ContentStatus>,
    pub featured_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogFilter {
    pub status: Option<ContentStatus>,
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct BlogStats {
    pub total_posts: i64,
    pub published_count: i64,
    pub draft_count: i64,
    pub archived_count: i64,
}

/// Lowercase, ASCII alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Brand -- Identity 2024 "), "brand-identity-2024");
        assert_eq!(slugify("???"), "");
    }
}
