use crate::config::RankingConfig;
use crate::models::{Post, RankedPost};
use crate::services::posts::{NewPost, PostChanges};
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, author_id, title, slug, description, content, tags, \
                            cover_image, view_count, is_published, created_at, updated_at";

/// Insert a new post under the given slug
///
/// The UNIQUE constraint on `slug` is the final authority on uniqueness;
/// callers handle a 23505 as a lost allocation race.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    new_post: &NewPost,
    slug: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, title, slug, description, content, tags, cover_image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, author_id, title, slug, description, content, tags,
                  cover_image, view_count, is_published, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(&new_post.title)
    .bind(slug)
    .bind(&new_post.description)
    .bind(&new_post.content)
    .bind(&new_post.tags)
    .bind(&new_post.cover_image)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Apply a partial update to the post addressed by `current_slug`
///
/// `None` fields keep their stored value; the slug is always written (it
/// equals the old one when the title did not change). Returns `None` when
/// the post disappeared between fetch and update.
pub async fn update_post(
    pool: &PgPool,
    current_slug: &str,
    new_slug: &str,
    changes: &PostChanges,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($1, title),
            slug = $2,
            content = COALESCE($3, content),
            description = COALESCE($4, description),
            tags = COALESCE($5, tags),
            cover_image = COALESCE($6, cover_image),
            is_published = COALESCE($7, is_published),
            updated_at = NOW()
        WHERE slug = $8
        RETURNING id, author_id, title, slug, description, content, tags,
                  cover_image, view_count, is_published, created_at, updated_at
        "#,
    )
    .bind(&changes.title)
    .bind(new_slug)
    .bind(&changes.content)
    .bind(&changes.description)
    .bind(&changes.tags)
    .bind(&changes.cover_image)
    .bind(changes.is_published)
    .bind(current_slug)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Existence probe by id, for validating foreign references
pub async fn find_post_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Delete a post by slug; returns whether a row was removed
pub async fn delete_post(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM posts WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Bump the view counter; returns false for an unknown slug
pub async fn increment_view_count(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        UPDATE posts
        SET view_count = view_count + 1
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// All posts, newest first
pub async fn list_recent(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Published posts, newest first
pub async fn list_published_recent(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts \
         WHERE is_published = TRUE ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Published posts by one author, newest first
pub async fn list_published_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts \
         WHERE author_id = $1 AND is_published = TRUE \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Every post by one author, drafts included, newest first
pub async fn list_all_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts \
         WHERE author_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Published posts authored by accounts the user follows, newest first
pub async fn list_followed_posts(
    pool: &PgPool,
    follower_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.author_id, p.title, p.slug, p.description, p.content, p.tags,
               p.cover_image, p.view_count, p.is_published, p.created_at, p.updated_at
        FROM posts p
        JOIN follows f ON f.following_id = p.author_id
        WHERE f.follower_id = $1 AND p.is_published = TRUE
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(follower_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Published posts ordered by composite popularity score
///
/// The score is a weighted sum of average rating, feedback count, comment
/// count, and view count, computed in SQL so OFFSET/LIMIT pagination sees
/// one consistent ordering. Ties fall back to `created_at`, then `id`,
/// both descending, which makes the order total.
pub async fn top_posts(
    pool: &PgPool,
    ranking: &RankingConfig,
    limit: i64,
    offset: i64,
) -> Result<Vec<RankedPost>, sqlx::Error> {
    let posts = sqlx::query_as::<_, RankedPost>(
        r#"
        SELECT p.id, p.author_id, p.title, p.slug, p.description, p.cover_image, p.tags,
               p.view_count, p.created_at,
               (COALESCE(fb.avg_rating, 0) * $1
                + COALESCE(fb.feedback_count, 0) * $2
                + COALESCE(cm.comment_count, 0) * $3
                + p.view_count::float8 * $4) AS score
        FROM posts p
        LEFT JOIN (
            SELECT post_id, AVG(rating)::float8 AS avg_rating, COUNT(*)::float8 AS feedback_count
            FROM post_feedback
            GROUP BY post_id
        ) fb ON fb.post_id = p.id
        LEFT JOIN (
            SELECT post_id, COUNT(*)::float8 AS comment_count
            FROM post_comments
            GROUP BY post_id
        ) cm ON cm.post_id = p.id
        WHERE p.is_published = TRUE
        ORDER BY score DESC, p.created_at DESC, p.id DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(ranking.rating_weight)
    .bind(ranking.feedback_weight)
    .bind(ranking.comment_weight)
    .bind(ranking.view_weight)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Title and view count of every post by an author, for the dashboard
pub async fn author_post_views(
    pool: &PgPool,
    author_id: Uuid,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT title, view_count FROM posts WHERE author_id = $1 ORDER BY created_at DESC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
