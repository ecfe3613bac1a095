use sqlx::PgExecutor;

/// Insert a like; returns false when the member had already liked the post
pub async fn create_like<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (member_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT like_unique_member_post DO NOTHING
        "#,
    )
    .bind(member_id)
    .bind(post_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a like; returns whether one existed
pub async fn delete_like<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: i64,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM likes WHERE member_id = $1 AND post_id = $2")
        .bind(member_id)
        .bind(post_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
