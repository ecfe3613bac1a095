use crate::models::{Chat, ChatListRow, ChatMemberRow};
use sqlx::PgExecutor;

/// The two-member chat shared by `a` and `b`, if one exists
pub async fn find_direct<'e, E: PgExecutor<'e>>(
    executor: E,
    a: i64,
    b: i64,
) -> Result<Option<Chat>, sqlx::Error> {
    sqlx::query_as::<_, Chat>(
        r#"
        SELECT c.id, c.created_at
        FROM chats c
        JOIN chat_members x ON x.chat_id = c.id AND x.member_id = $1
        JOIN chat_members y ON y.chat_id = c.id AND y.member_id = $2
        WHERE (SELECT COUNT(*) FROM chat_members z WHERE z.chat_id = c.id) = 2
        ORDER BY c.id ASC
        LIMIT 1
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_optional(executor)
    .await
}

pub async fn create_chat<'e, E: PgExecutor<'e>>(executor: E) -> Result<Chat, sqlx::Error> {
    sqlx::query_as::<_, Chat>("INSERT INTO chats DEFAULT VALUES RETURNING id, created_at")
        .fetch_one(executor)
        .await
}

pub async fn add_members<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
    member_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO chat_members (chat_id, member_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(chat_id)
    .bind(member_ids)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn is_member<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_id: i64,
    member_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM chat_members WHERE chat_id = $1 AND member_id = $2)",
    )
    .bind(chat_id)
    .bind(member_id)
    .fetch_one(executor)
    .await
}

/// Chat + latest message + unread count for member `$1`
const CHAT_ROW_SELECT: &str = r#"
    SELECT c.id, c.created_at,
           COALESCE(lm.created_at, c.created_at) AS last_activity,
           lm.id AS last_message_id,
           lm.text AS last_message_text,
           lm.author_id AS last_message_author_id,
           lm.created_at AS last_message_at,
           (SELECT COUNT(*) FROM messages u
            WHERE u.chat_id = c.id AND u.author_id <> $1 AND NOT u.is_read) AS unread_count
    FROM chats c
    JOIN chat_members cm ON cm.chat_id = c.id AND cm.member_id = $1
    LEFT JOIN LATERAL (
        SELECT m.id, m.text, m.author_id, m.created_at
        FROM messages m
        WHERE m.chat_id = c.id
        ORDER BY m.created_at DESC, m.id DESC
        LIMIT 1
    ) lm ON TRUE
"#;

/// Chats of a member, most recently active first
pub async fn list_for_member<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChatListRow>, sqlx::Error> {
    let sql = format!(
        r#"
        {CHAT_ROW_SELECT}
        ORDER BY last_activity DESC, c.id DESC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, ChatListRow>(&sql)
        .bind(member_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

/// One chat as listed for `member_id`; `None` if they are not in it
pub async fn find_for_member<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    chat_id: i64,
) -> Result<Option<ChatListRow>, sqlx::Error> {
    let sql = format!("{CHAT_ROW_SELECT} WHERE c.id = $2");
    sqlx::query_as::<_, ChatListRow>(&sql)
        .bind(member_id)
        .bind(chat_id)
        .fetch_optional(executor)
        .await
}

pub async fn count_for_member<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chat_members WHERE member_id = $1")
        .bind(member_id)
        .fetch_one(executor)
        .await
}

/// Members of the given chats, ordered by chat then username
pub async fn members_of<'e, E: PgExecutor<'e>>(
    executor: E,
    chat_ids: &[i64],
) -> Result<Vec<ChatMemberRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatMemberRow>(
        r#"
        SELECT cm.chat_id, m.id, m.username, m.avatar, m.last_seen
        FROM chat_members cm
        JOIN members m ON m.id = cm.member_id
        WHERE cm.chat_id = ANY($1)
        ORDER BY cm.chat_id, m.username
        "#,
    )
    .bind(chat_ids)
    .fetch_all(executor)
    .await
}
