use crate::models::{Feedback, FeedbackWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert-or-update a user's feedback on a post
///
/// The UNIQUE (post_id, user_id) constraint makes this idempotent: a second
/// submission from the same user overwrites the rating and comment.
pub async fn upsert_feedback(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    rating: i32,
    comment: Option<&str>,
) -> Result<Feedback, sqlx::Error> {
    let feedback = sqlx::query_as::<_, Feedback>(
        r#"
        INSERT INTO post_feedback (post_id, user_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (post_id, user_id)
        DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, updated_at = NOW()
        RETURNING id, post_id, user_id, rating, comment, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(feedback)
}

/// Feedback rows for a post with author usernames, newest first
pub async fn feedback_for_post(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedbackWithAuthor>, sqlx::Error> {
    let feedback = sqlx::query_as::<_, FeedbackWithAuthor>(
        r#"
        SELECT f.id, f.post_id, f.user_id, f.rating, f.comment,
               u.username, f.created_at, f.updated_at
        FROM post_feedback f
        JOIN users u ON f.user_id = u.id
        WHERE f.post_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(feedback)
}

/// Total feedback rows for a post
pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_feedback WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Mean rating of a post; 0 when it has no feedback
pub async fn average_rating(pool: &PgPool, post_id: Uuid) -> Result<f64, sqlx::Error> {
    let average: f64 = sqlx::query_scalar(
        "SELECT COALESCE(AVG(rating), 0)::float8 FROM post_feedback WHERE post_id = $1",
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(average)
}

/// Mean rating across every post by an author; 0 without any feedback
pub async fn author_average_rating(pool: &PgPool, author_id: Uuid) -> Result<f64, sqlx::Error> {
    let average: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(AVG(rating), 0)::float8
        FROM post_feedback
        WHERE post_id IN (SELECT id FROM posts WHERE author_id = $1)
        "#,
    )
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(average)
}

/// Get a feedback row by id
pub async fn find_by_id(pool: &PgPool, feedback_id: Uuid) -> Result<Option<Feedback>, sqlx::Error> {
    let feedback = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, post_id, user_id, rating, comment, created_at, updated_at
        FROM post_feedback
        WHERE id = $1
        "#,
    )
    .bind(feedback_id)
    .fetch_optional(pool)
    .await?;

    Ok(feedback)
}

/// Delete a feedback row
pub async fn delete_feedback(pool: &PgPool, feedback_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM post_feedback WHERE id = $1")
        .bind(feedback_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
