use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::post::validate_not_blank;
use super::MemberSummary;

pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, FromRow)]
pub struct Chat {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// One row of the chat list query: the chat, its latest message (if any) and
/// the viewer's unread count.
#[derive(Debug, Clone, FromRow)]
pub struct ChatListRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub last_message_id: Option<i64>,
    pub last_message_text: Option<String>,
    pub last_message_author_id: Option<i64>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatMemberRow {
    pub chat_id: i64,
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl From<ChatMemberRow> for MemberSummary {
    fn from(row: ChatMemberRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            avatar: row.avatar,
            last_seen: row.last_seen,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastMessage {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: i64,
    pub name: String,
    pub opponent_id: Option<i64>,
    pub opponent_last_seen: Option<DateTime<Utc>>,
    pub members: Vec<MemberSummary>,
    pub last_message: Option<LastMessage>,
    pub last_preview: String,
    pub last_time: DateTime<Utc>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

/// First `PREVIEW_CHARS` characters of a message.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

impl ChatResponse {
    pub fn assemble(viewer_id: i64, row: ChatListRow, members: Vec<MemberSummary>) -> Self {
        let others: Vec<&MemberSummary> = members.iter().filter(|m| m.id != viewer_id).collect();

        let opponent = match others.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        let name = if others.is_empty() {
            members
                .first()
                .map(|m| m.username.clone())
                .unwrap_or_default()
        } else {
            others
                .iter()
                .map(|m| m.username.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let last_message = match (
            row.last_message_id,
            row.last_message_text,
            row.last_message_author_id,
            row.last_message_at,
        ) {
            (Some(id), Some(text), Some(author_id), Some(created_at)) => Some(LastMessage {
                id,
                text,
                author_id,
                created_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name,
            opponent_id: opponent.map(|m| m.id),
            opponent_last_seen: opponent.map(|m| m.last_seen),
            last_preview: last_message
                .as_ref()
                .map(|m| preview(&m.text))
                .unwrap_or_default(),
            last_time: row.last_activity,
            last_message,
            unread_count: row.unread_count,
            created_at: row.created_at,
            members,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub author_last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub is_read: bool,
    pub author: MemberSummary,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for MessageResponse {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            chat_id: row.chat_id,
            text: row.text,
            is_read: row.is_read,
            author: MemberSummary {
                id: row.author_id,
                username: row.author_username,
                avatar: row.author_avatar,
                last_seen: row.author_last_seen,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(
        length(min = 1, max = 5000, message = "must be between 1 and 5000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenChatRequest {
    #[validate(length(min = 1, max = 30, message = "must be between 1 and 30 characters"))]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, name: &str) -> MemberSummary {
        MemberSummary {
            id,
            username: name.to_string(),
            avatar: None,
            last_seen: Utc::now(),
        }
    }

    fn row(last_text: Option<&str>) -> ChatListRow {
        let now = Utc::now();
        ChatListRow {
            id: 7,
            created_at: now,
            last_activity: now,
            last_message_id: last_text.map(|_| 99),
            last_message_text: last_text.map(|t| t.to_string()),
            last_message_author_id: last_text.map(|_| 2),
            last_message_at: last_text.map(|_| now),
            unread_count: 3,
        }
    }

    #[test]
    fn direct_chat_is_named_after_opponent() {
        let chat = ChatResponse::assemble(
            1,
            row(Some("hey")),
            vec![member(1, "alice"), member(2, "bob")],
        );
        assert_eq!(chat.name, "bob");
        assert_eq!(chat.opponent_id, Some(2));
        assert_eq!(chat.last_preview, "hey");
        assert_eq!(chat.unread_count, 3);
        assert_eq!(chat.last_message.map(|m| m.id), Some(99));
    }

    #[test]
    fn empty_chat_has_no_last_message() {
        let chat = ChatResponse::assemble(1, row(None), vec![member(1, "alice"), member(2, "bob")]);
        assert!(chat.last_message.is_none());
        assert_eq!(chat.last_preview, "");
    }

    #[test]
    fn group_chat_has_no_single_opponent() {
        let chat = ChatResponse::assemble(
            1,
            row(None),
            vec![member(1, "alice"), member(2, "bob"), member(3, "carol")],
        );
        assert_eq!(chat.name, "bob, carol");
        assert_eq!(chat.opponent_id, None);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(80);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
