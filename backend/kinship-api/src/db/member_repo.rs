use crate::models::{Member, MemberSummary};
use sqlx::PgExecutor;

const MEMBER_COLUMNS: &str =
    "id, username, email, password_hash, avatar, last_seen, last_login, is_active, created_at";

/// Insert a new member
pub async fn create_member<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
    avatar: Option<&str>,
) -> Result<Member, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO members (username, email, password_hash, avatar)
        VALUES ($1, $2, $3, $4)
        RETURNING {MEMBER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Member>(&sql)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(avatar)
        .fetch_one(executor)
        .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Member>, sqlx::Error> {
    let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1");
    sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Exact (case-sensitive) username lookup
pub async fn find_by_username<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
) -> Result<Option<Member>, sqlx::Error> {
    let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE username = $1");
    sqlx::query_as::<_, Member>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await
}

/// Stamp a successful login
pub async fn record_login<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE members SET last_login = NOW(), last_seen = NOW() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Refresh `last_seen`, but only when the stored value is over a minute old.
/// Returns whether a row was written.
pub async fn touch_last_seen<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE members SET last_seen = NOW()
        WHERE id = $1 AND last_seen < NOW() - INTERVAL '1 minute'
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Update editable profile fields. `email = None` keeps the current email;
/// `avatar = None` keeps the avatar, `Some(None)` clears it.
pub async fn update_profile<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    email: Option<&str>,
    avatar: Option<Option<&str>>,
) -> Result<Member, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE members
        SET email = COALESCE($2, email),
            avatar = CASE WHEN $3 THEN $4 ELSE avatar END
        WHERE id = $1
        RETURNING {MEMBER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .bind(email)
        .bind(avatar.is_some())
        .bind(avatar.flatten())
        .fetch_one(executor)
        .await
}

/// Active members (other than the viewer) whose username contains `pattern`,
/// ordered by username. `pattern` must already be LIKE-escaped.
pub async fn search<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    pattern: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<MemberSummary>, sqlx::Error> {
    sqlx::query_as::<_, MemberSummary>(
        r#"
        SELECT id, username, avatar, last_seen
        FROM members
        WHERE is_active AND id <> $1
          AND username ILIKE '%' || $2 || '%' ESCAPE '\'
        ORDER BY username ASC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(viewer_id)
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count_search<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    pattern: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM members
        WHERE is_active AND id <> $1
          AND username ILIKE '%' || $2 || '%' ESCAPE '\'
        "#,
    )
    .bind(viewer_id)
    .bind(pattern)
    .fetch_one(executor)
    .await
}

/// Row-lock a pair of members in id order
pub async fn lock_pair<'e, E: PgExecutor<'e>>(
    executor: E,
    a: i64,
    b: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM members WHERE id IN ($1, $2) ORDER BY id FOR UPDATE")
        .bind(a)
        .bind(b)
        .fetch_all(executor)
        .await?;
    Ok(())
}
