use crate::models::{Comment, CommentRow};
use sqlx::PgExecutor;

const COMMENT_ROW_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.parent_id, c.text, c.created_at,
           m.id AS author_id, m.username AS author_username,
           m.avatar AS author_avatar, m.last_seen AS author_last_seen,
           (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS replies_count
    FROM comments c
    JOIN members m ON m.id = c.author_id
"#;

pub async fn create_comment<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
    author_id: i64,
    parent_id: Option<i64>,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, parent_id, text)
        VALUES ($1, $2, $3, $4)
        RETURNING id, post_id, author_id, parent_id, text, created_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(parent_id)
    .bind(text)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author_id, parent_id, text, created_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_row<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<CommentRow>, sqlx::Error> {
    let sql = format!("{COMMENT_ROW_SELECT} WHERE c.id = $1");
    sqlx::query_as::<_, CommentRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Comments on a post, oldest first
pub async fn list_for_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {COMMENT_ROW_SELECT}
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC, c.id ASC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, CommentRow>(&sql)
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_for_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(executor)
        .await
}
