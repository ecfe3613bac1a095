use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::MemberSummary;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

/// Directed edge: `from_member_id` asked `to_member_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Friendship {
    pub id: i64,
    pub from_member_id: i64,
    pub to_member_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    pub fn status(&self) -> FriendshipStatus {
        match self.status.as_str() {
            STATUS_ACCEPTED => FriendshipStatus::Accepted,
            _ => FriendshipStatus::Pending,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status() == FriendshipStatus::Accepted
    }

    pub fn involves(&self, member_id: i64) -> bool {
        self.from_member_id == member_id || self.to_member_id == member_id
    }
}

/// How the viewer relates to another member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[serde(rename = "self")]
    Myself,
    Friends,
    RequestSent,
    RequestReceived,
    None,
}

impl Relation {
    /// Classify from the (at most one relevant) edge between the two members.
    pub fn classify(viewer_id: i64, other_id: i64, edge: Option<&Friendship>) -> Self {
        if viewer_id == other_id {
            return Relation::Myself;
        }
        match edge {
            Some(f) if f.is_accepted() => Relation::Friends,
            Some(f) if f.from_member_id == viewer_id && f.to_member_id == other_id => {
                Relation::RequestSent
            }
            Some(f) if f.from_member_id == other_id && f.to_member_id == viewer_id => {
                Relation::RequestReceived
            }
            _ => Relation::None,
        }
    }
}

/// Which side of pending requests to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    #[default]
    Incoming,
    Outgoing,
}

/// Friend request with both endpoints expanded.
#[derive(Debug, Clone, FromRow)]
pub struct FriendRequestRow {
    pub id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub from_id: i64,
    pub from_username: String,
    pub from_avatar: Option<String>,
    pub from_last_seen: DateTime<Utc>,
    pub to_id: i64,
    pub to_username: String,
    pub to_avatar: Option<String>,
    pub to_last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestResponse {
    pub id: i64,
    pub from: MemberSummary,
    pub to: MemberSummary,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl From<FriendRequestRow> for FriendRequestResponse {
    fn from(row: FriendRequestRow) -> Self {
        let status = if row.status == STATUS_ACCEPTED {
            FriendshipStatus::Accepted
        } else {
            FriendshipStatus::Pending
        };
        Self {
            id: row.id,
            from: MemberSummary {
                id: row.from_id,
                username: row.from_username,
                avatar: row.from_avatar,
                last_seen: row.from_last_seen,
            },
            to: MemberSummary {
                id: row.to_id,
                username: row.to_username,
                avatar: row.to_avatar,
                last_seen: row.to_last_seen,
            },
            status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendFriendRequest {
    #[validate(length(min = 1, max = 30, message = "must be between 1 and 30 characters"))]
    pub target_username: String,
}

/// Search hit: a member plus how the viewer relates to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSearchResult {
    #[serde(flatten)]
    pub member: MemberSummary,
    pub friendship: Relation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: i64, to: i64, status: &str) -> Friendship {
        Friendship {
            id: 1,
            from_member_id: from,
            to_member_id: to,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn classify_self_wins() {
        assert_eq!(Relation::classify(1, 1, None), Relation::Myself);
    }

    #[test]
    fn classify_accepted_in_either_direction() {
        assert_eq!(
            Relation::classify(1, 2, Some(&edge(1, 2, STATUS_ACCEPTED))),
            Relation::Friends
        );
        assert_eq!(
            Relation::classify(1, 2, Some(&edge(2, 1, STATUS_ACCEPTED))),
            Relation::Friends
        );
    }

    #[test]
    fn classify_pending_by_direction() {
        assert_eq!(
            Relation::classify(1, 2, Some(&edge(1, 2, STATUS_PENDING))),
            Relation::RequestSent
        );
        assert_eq!(
            Relation::classify(1, 2, Some(&edge(2, 1, STATUS_PENDING))),
            Relation::RequestReceived
        );
        assert_eq!(Relation::classify(1, 2, None), Relation::None);
    }

    #[test]
    fn relation_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Relation::Myself).unwrap(), "\"self\"");
        assert_eq!(
            serde_json::to_string(&Relation::RequestReceived).unwrap(),
            "\"request_received\""
        );
    }
}
