use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::post::validate_not_blank;
use super::MemberSummary;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub author_last_seen: DateTime<Utc>,
    pub replies_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub text: String,
    pub author: MemberSummary,
    pub replies_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            parent_id: row.parent_id,
            text: row.text,
            author: MemberSummary {
                id: row.author_id,
                username: row.author_username,
                avatar: row.author_avatar,
                last_seen: row.author_last_seen,
            },
            replies_count: row.replies_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub text: String,
    /// Id of the comment being replied to.
    #[serde(default)]
    pub parent: Option<i64>,
}
