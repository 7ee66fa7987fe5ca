use crate::models::{Comment, CommentWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment, optionally as a reply to a parent comment
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    content: &str,
    parent_comment_id: Option<Uuid>,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO post_comments (post_id, user_id, parent_comment_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, post_id, user_id, parent_comment_id, content, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(parent_comment_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// All comments on a post with author usernames, oldest first
///
/// The flat list carries `parent_comment_id`, so clients rebuild the
/// reply tree themselves.
pub async fn comments_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.post_id, c.user_id, c.parent_comment_id, c.content,
               u.username, c.created_at, c.updated_at
        FROM post_comments c
        JOIN users u ON c.user_id = u.id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Get a single comment by id
pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, user_id, parent_comment_id, content, created_at, updated_at
        FROM post_comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Update comment content
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE post_comments
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING id, post_id, user_id, parent_comment_id, content, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment; replies go with it via ON DELETE CASCADE
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM post_comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
