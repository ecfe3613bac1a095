use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub member_id: i64,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Session joined to its (active) member, as resolved by the auth middleware.
#[derive(Debug, Clone, FromRow)]
pub struct SessionMember {
    pub session_id: i64,
    pub member_id: i64,
    pub username: String,
    pub last_seen: DateTime<Utc>,
}
