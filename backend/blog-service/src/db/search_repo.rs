use crate::models::{PostSummary, PublicUser, SearchHit};
use sqlx::PgPool;

/// Posts whose title or content contains the term, for the quick search box
pub async fn quick_search_posts(
    pool: &PgPool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<PostSummary>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostSummary>(
        r#"
        SELECT id, title, slug
        FROM posts
        WHERE title ILIKE $1 OR content ILIKE $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Users whose username contains the term, for the quick search box
pub async fn quick_search_users(
    pool: &PgPool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<PublicUser>, sqlx::Error> {
    let users = sqlx::query_as::<_, PublicUser>(
        r#"
        SELECT id, username, avatar_url, bio
        FROM users
        WHERE username ILIKE $1
        ORDER BY username ASC
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Full-text search over published posts
///
/// Matches the query against title, content, description, tags, and the
/// author's username using the `english` text search configuration.
pub async fn fulltext_search_posts(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<SearchHit>, sqlx::Error> {
    let hits = sqlx::query_as::<_, SearchHit>(
        r#"
        SELECT
            posts.id,
            posts.title,
            posts.slug,
            posts.description,
            posts.cover_image,
            posts.tags,
            posts.created_at,
            users.username AS author
        FROM posts
        JOIN users ON posts.author_id = users.id
        WHERE (
            to_tsvector('english', COALESCE(posts.title, '') || ' ' || COALESCE(posts.content, '') || ' ' || COALESCE(posts.description, '')) ||
            to_tsvector('english', COALESCE(array_to_string(posts.tags, ' '), '')) ||
            to_tsvector('english', COALESCE(users.username, ''))
        ) @@ plainto_tsquery('english', $1)
        AND posts.is_published = TRUE
        ORDER BY posts.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(query)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(hits)
}
