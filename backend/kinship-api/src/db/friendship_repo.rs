use super::FRIEND_IDS_OF_P1;
use crate::models::{
    FriendRequestRow, Friendship, MemberSummary, RequestDirection, STATUS_ACCEPTED, STATUS_PENDING,
};
use sqlx::PgExecutor;

const FRIENDSHIP_COLUMNS: &str = "id, from_member_id, to_member_id, status, created_at";

const REQUEST_SELECT: &str = r#"
    SELECT f.id, f.status, f.created_at,
           fm.id AS from_id, fm.username AS from_username,
           fm.avatar AS from_avatar, fm.last_seen AS from_last_seen,
           tm.id AS to_id, tm.username AS to_username,
           tm.avatar AS to_avatar, tm.last_seen AS to_last_seen
    FROM friendships f
    JOIN members fm ON fm.id = f.from_member_id
    JOIN members tm ON tm.id = f.to_member_id
"#;

fn direction_column(direction: RequestDirection) -> &'static str {
    match direction {
        RequestDirection::Incoming => "f.to_member_id",
        RequestDirection::Outgoing => "f.from_member_id",
    }
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Friendship>, sqlx::Error> {
    let sql = format!("SELECT {FRIENDSHIP_COLUMNS} FROM friendships WHERE id = $1");
    sqlx::query_as::<_, Friendship>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// The edge between two members in either direction, accepted rows first
pub async fn find_between<'e, E: PgExecutor<'e>>(
    executor: E,
    a: i64,
    b: i64,
) -> Result<Option<Friendship>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {FRIENDSHIP_COLUMNS}
        FROM friendships
        WHERE (from_member_id = $1 AND to_member_id = $2)
           OR (from_member_id = $2 AND to_member_id = $1)
        ORDER BY (status = 'accepted') DESC, id ASC
        LIMIT 1
        "#
    );
    sqlx::query_as::<_, Friendship>(&sql)
        .bind(a)
        .bind(b)
        .fetch_optional(executor)
        .await
}

/// All edges between `viewer_id` and any of `others`
pub async fn find_edges_with<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    others: &[i64],
) -> Result<Vec<Friendship>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {FRIENDSHIP_COLUMNS}
        FROM friendships
        WHERE (from_member_id = $1 AND to_member_id = ANY($2))
           OR (to_member_id = $1 AND from_member_id = ANY($2))
        "#
    );
    sqlx::query_as::<_, Friendship>(&sql)
        .bind(viewer_id)
        .bind(others)
        .fetch_all(executor)
        .await
}

pub async fn are_friends<'e, E: PgExecutor<'e>>(
    executor: E,
    a: i64,
    b: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM friendships
            WHERE status = 'accepted'
              AND ((from_member_id = $1 AND to_member_id = $2)
                OR (from_member_id = $2 AND to_member_id = $1))
        )
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(executor)
    .await
}

/// Insert a pending request
pub async fn create_request<'e, E: PgExecutor<'e>>(
    executor: E,
    from_member_id: i64,
    to_member_id: i64,
) -> Result<Friendship, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO friendships (from_member_id, to_member_id, status)
        VALUES ($1, $2, $3)
        RETURNING {FRIENDSHIP_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Friendship>(&sql)
        .bind(from_member_id)
        .bind(to_member_id)
        .bind(STATUS_PENDING)
        .fetch_one(executor)
        .await
}

/// Flip a pending request to accepted; `None` if it was not pending
pub async fn accept<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Friendship>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE friendships SET status = $2
        WHERE id = $1 AND status = $3
        RETURNING {FRIENDSHIP_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Friendship>(&sql)
        .bind(id)
        .bind(STATUS_ACCEPTED)
        .bind(STATUS_PENDING)
        .fetch_optional(executor)
        .await
}

pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM friendships WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Remove an accepted friendship in either direction
pub async fn delete_accepted_between<'e, E: PgExecutor<'e>>(
    executor: E,
    a: i64,
    b: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM friendships
        WHERE status = 'accepted'
          AND ((from_member_id = $1 AND to_member_id = $2)
            OR (from_member_id = $2 AND to_member_id = $1))
        "#,
    )
    .bind(a)
    .bind(b)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Accepted friends of a member, ordered by username
pub async fn list_friends<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<MemberSummary>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT m.id, m.username, m.avatar, m.last_seen
        FROM members m
        WHERE m.id IN ({FRIEND_IDS_OF_P1})
        ORDER BY m.username ASC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, MemberSummary>(&sql)
        .bind(member_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_friends<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM friendships
        WHERE status = 'accepted' AND (from_member_id = $1 OR to_member_id = $1)
        "#,
    )
    .bind(member_id)
    .fetch_one(executor)
    .await
}

/// Pending requests to or from a member, newest first
pub async fn list_pending<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    direction: RequestDirection,
    limit: i64,
    offset: i64,
) -> Result<Vec<FriendRequestRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {REQUEST_SELECT}
        WHERE {} = $1 AND f.status = 'pending'
        ORDER BY f.created_at DESC, f.id DESC
        LIMIT $2 OFFSET $3
        "#,
        direction_column(direction)
    );
    sqlx::query_as::<_, FriendRequestRow>(&sql)
        .bind(member_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_pending<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    direction: RequestDirection,
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "SELECT COUNT(*) FROM friendships f WHERE {} = $1 AND f.status = 'pending'",
        direction_column(direction)
    );
    sqlx::query_scalar(&sql)
        .bind(member_id)
        .fetch_one(executor)
        .await
}

/// One request with both member summaries
pub async fn find_request_row<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<FriendRequestRow>, sqlx::Error> {
    let sql = format!("{REQUEST_SELECT} WHERE f.id = $1");
    sqlx::query_as::<_, FriendRequestRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}
