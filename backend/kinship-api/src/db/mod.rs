/// Database access layer
///
/// One repository per table. Functions are free `async fn`s that take any
/// `PgExecutor`, so callers can pass `&PgPool` or `&mut *tx` alike.
pub mod chat_repo;
pub mod comment_repo;
pub mod friendship_repo;
pub mod like_repo;
pub mod member_repo;
pub mod message_repo;
pub mod post_repo;
pub mod session_repo;

use sqlx::PgPool;

/// Apply the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// SQL fragment selecting the ids of `$1`'s accepted friends, in either
/// direction.
pub(crate) const FRIEND_IDS_OF_P1: &str = r#"
    SELECT CASE WHEN f.from_member_id = $1 THEN f.to_member_id ELSE f.from_member_id END
    FROM friendships f
    WHERE f.status = 'accepted' AND (f.from_member_id = $1 OR f.to_member_id = $1)
"#;

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE`.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
