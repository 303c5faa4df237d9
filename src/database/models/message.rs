use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::MessageType;

/// A message in a user's inbox. `user_id` is the owning user; `sender_id` is
/// whoever wrote it (the user themself for replies, an admin otherwise).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub sender_id: Option<i64>,
    pub title: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub message_type: MessageType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: i64,
    pub sender_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub message_type: MessageType,
}

/// Admin inbox row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageWithUsers {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub message: Message,
    pub sender_email: Option<String>,
    pub recipient_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct MessageStats {
    pub total_messages: i64,
    pub unread_count: i64,
}
