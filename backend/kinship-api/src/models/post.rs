use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::MemberSummary;

pub const MAX_MEDIA_URLS: usize = 10;

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub media_urls: Json<Vec<String>>,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its author and the viewer's like flag.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub content: String,
    pub media_urls: Json<Vec<String>>,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub author_last_seen: DateTime<Utc>,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub content: String,
    pub media_urls: Vec<String>,
    pub author: MemberSummary,
    pub likes_count: i32,
    pub comments_count: i32,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            media_urls: row.media_urls.0,
            author: MemberSummary {
                id: row.author_id,
                username: row.author_username,
                avatar: row.author_avatar,
                last_seen: row.author_last_seen,
            },
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            is_liked: row.is_liked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_media_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > MAX_MEDIA_URLS {
        let mut err = ValidationError::new("too_many");
        err.message = Some(format!("at most {} media URLs are allowed", MAX_MEDIA_URLS).into());
        return Err(err);
    }
    let all_urls = urls.iter().all(|u| {
        let u = u.trim();
        (u.starts_with("http://") || u.starts_with("https://")) && u.len() > "https://".len()
    });
    if !all_urls {
        let mut err = ValidationError::new("url");
        err.message = Some("media URLs must be http(s) URLs".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub content: String,
    #[serde(default)]
    #[validate(custom(function = "validate_media_urls"))]
    pub media_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub likes_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        let req = CreatePostRequest {
            content: "   ".into(),
            media_urls: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn media_urls_are_checked() {
        let mut req = CreatePostRequest {
            content: "hello".into(),
            media_urls: vec!["https://cdn.example.com/1.jpg".into()],
        };
        assert!(req.validate().is_ok());

        req.media_urls.push("ftp://nope".into());
        assert!(req.validate().is_err());

        req.media_urls = (0..=MAX_MEDIA_URLS)
            .map(|i| format!("https://cdn.example.com/{}.jpg", i))
            .collect();
        assert!(req.validate().is_err());
    }

    #[test]
    fn media_urls_default_to_empty() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
        assert!(req.media_urls.is_empty());
        assert!(req.validate().is_ok());
    }
}
