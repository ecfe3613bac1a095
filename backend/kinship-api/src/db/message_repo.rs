use crate::models::{Message, MessageRow};
use sqlx::PgExecutor;

const MESSAGE_ROW_SELECT: &str = r#"
    SELECT msg.id, msg.chat_id, msg.text, msg.is_read, msg.created_at,
           m.id AS author_id, m.username AS author_username,
           m.avatar AS author_avatar, m.last_seen AS author_last_seen
    FROM messages msg
    JOIN members m ON m.id = msg.author_id
"#;

pub async fn create_message<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (chat_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, chat_id, author_id, text, is_read, created_at
        "#,
    )
    .bind(chat_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(executor)
    .await
}

pub async fn find_row<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<MessageRow>, sqlx::Error> {
    let sql = format!("{MESSAGE_ROW_SELECT} WHERE msg.id = $1");
    sqlx::query_as::<_, MessageRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Messages in a chat, oldest first
pub async fn list_for_chat<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {MESSAGE_ROW_SELECT}
        WHERE msg.chat_id = $1
        ORDER BY msg.created_at ASC, msg.id ASC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, MessageRow>(&sql)
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_for_chat<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE chat_id = $1")
        .bind(chat_id)
        .fetch_one(executor)
        .await
}

/// Mark every message in the chat not written by `reader_id` as read
pub async fn mark_read<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
    reader_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE messages SET is_read = TRUE
        WHERE chat_id = $1 AND author_id <> $2 AND NOT is_read
        "#,
    )
    .bind(chat_id)
    .bind(reader_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
