use crate::models::{Session, SessionMember};
use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

/// Persist a session for an already-hashed token
pub async fn create_session<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    token_hash: &str,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
    expires_at: DateTime<Utc>,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (member_id, token_hash, ip_address, user_agent, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, member_id, token_hash, ip_address, user_agent, created_at, expires_at
        "#,
    )
    .bind(member_id)
    .bind(token_hash)
    .bind(ip_address)
    .bind(user_agent)
    .bind(expires_at)
    .fetch_one(executor)
    .await
}

/// Resolve a token hash to a live session of an active member
pub async fn find_active<'e, E: PgExecutor<'e>>(
    executor: E,
    token_hash: &str,
) -> Result<Option<SessionMember>, sqlx::Error> {
    sqlx::query_as::<_, SessionMember>(
        r#"
        SELECT s.id AS session_id, m.id AS member_id, m.username, m.last_seen
        FROM sessions s
        JOIN members m ON m.id = s.member_id
        WHERE s.token_hash = $1 AND s.expires_at > NOW() AND m.is_active
        "#,
    )
    .bind(token_hash)
    .fetch_optional(executor)
    .await
}

pub async fn delete_session<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Drop every expired session, returning how many were removed
pub async fn delete_expired<'e, E: PgExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
