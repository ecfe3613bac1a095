use super::FRIEND_IDS_OF_P1;
use crate::models::{Post, PostRow};
use sqlx::types::Json;
use sqlx::PgExecutor;

const POST_COLUMNS: &str =
    "id, author_id, content, media_urls, likes_count, comments_count, created_at, updated_at";

/// Post + author + viewer like flag; `$1` is always the viewer.
const POST_ROW_SELECT: &str = r#"
    SELECT p.id, p.content, p.media_urls, p.likes_count, p.comments_count,
           p.created_at, p.updated_at,
           m.id AS author_id, m.username AS author_username,
           m.avatar AS author_avatar, m.last_seen AS author_last_seen,
           EXISTS (
               SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.member_id = $1
           ) AS is_liked
    FROM posts p
    JOIN members m ON m.id = p.author_id
"#;

pub async fn create_post<'e, E: PgExecutor<'e>>(
    executor: E,
    author_id: i64,
    content: &str,
    media_urls: &[String],
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO posts (author_id, content, media_urls)
        VALUES ($1, $2, $3)
        RETURNING {POST_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(author_id)
        .bind(content)
        .bind(Json(media_urls))
        .fetch_one(executor)
        .await
}

/// A post, if its author is the viewer or one of the viewer's friends
pub async fn find_visible<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    post_id: i64,
) -> Result<Option<PostRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {POST_ROW_SELECT}
        WHERE p.id = $2
          AND (p.author_id = $1 OR p.author_id IN ({FRIEND_IDS_OF_P1}))
        "#
    );
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .bind(post_id)
        .fetch_optional(executor)
        .await
}

/// The viewer's news feed: own posts plus friends' posts, newest first
pub async fn feed<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {POST_ROW_SELECT}
        WHERE p.author_id = $1 OR p.author_id IN ({FRIEND_IDS_OF_P1})
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_feed<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT COUNT(*) FROM posts p
        WHERE p.author_id = $1 OR p.author_id IN ({FRIEND_IDS_OF_P1})
        "#
    );
    sqlx::query_scalar(&sql)
        .bind(viewer_id)
        .fetch_one(executor)
        .await
}

/// Posts by one author, newest first, with the viewer's like flags
pub async fn list_by_author<'e, E: PgExecutor<'e>>(
    executor: E,
    viewer_id: i64,
    author_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {POST_ROW_SELECT}
        WHERE p.author_id = $2
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $3 OFFSET $4
        "#
    );
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_by_author<'e, E: PgExecutor<'e>>(
    executor: E,
    author_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(executor)
        .await
}

pub async fn delete_post<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Take the row lock used to serialise counter updates on one post
pub async fn lock_post<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let row: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Add `delta` to `likes_count` (never below zero) and return the new value
pub async fn adjust_likes_count<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    delta: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE posts SET likes_count = GREATEST(likes_count + $2, 0)
        WHERE id = $1
        RETURNING likes_count
        "#,
    )
    .bind(id)
    .bind(delta)
    .fetch_one(executor)
    .await
}

pub async fn adjust_comments_count<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    delta: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE posts SET comments_count = GREATEST(comments_count + $2, 0)
        WHERE id = $1
        RETURNING comments_count
        "#,
    )
    .bind(id)
    .bind(delta)
    .fetch_one(executor)
    .await
}
