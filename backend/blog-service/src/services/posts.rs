/// Post lifecycle service
///
/// Owns the slug allocation protocol around post creation and updates.
/// `generate_unique_slug` is check-then-act: a concurrent request can win
/// the same slug between the check and our INSERT/UPDATE, in which case
/// PostgreSQL raises a unique violation on `posts.slug`. That is handled
/// here as a recoverable conflict: re-probe (the winner's row is visible
/// now, so the next candidate differs) and retry, a bounded number of
/// times.
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::RankingConfig;
use crate::db::post_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::middleware::{permissions, AuthUser};
use crate::models::{Post, RankedPost};
use crate::services::slug::{generate_unique_slug, slugify};

/// How many times a lost insert race is retried before giving up.
pub const MAX_SLUG_RETRIES: u32 = 3;

/// Fields of a post creation, already validated at the boundary.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
}

/// Partial update of a post; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub is_published: Option<bool>,
}

pub struct PostService {
    pool: PgPool,
    ranking: RankingConfig,
}

impl PostService {
    pub fn new(pool: PgPool, ranking: RankingConfig) -> Self {
        Self { pool, ranking }
    }

    /// Create a post under a freshly allocated slug.
    pub async fn create_post(&self, author_id: Uuid, new_post: NewPost) -> Result<Post> {
        let base = slugify(&new_post.title);

        for attempt in 1..=MAX_SLUG_RETRIES {
            let slug = generate_unique_slug(&self.pool, &base, None).await?;

            match post_repo::create_post(&self.pool, author_id, &new_post, &slug).await {
                Ok(post) => return Ok(post),
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(
                        slug = %slug,
                        attempt,
                        "slug was taken by a concurrent insert, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique slug, please retry".to_string(),
        ))
    }

    /// Update the post addressed by `slug`, reallocating the slug when the
    /// title changes. The post's own slug is excluded from the uniqueness
    /// check so an unchanged title keeps it.
    pub async fn update_post(
        &self,
        slug: &str,
        user: &AuthUser,
        changes: PostChanges,
    ) -> Result<Post> {
        let existing = post_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        permissions::check_post_access(user, &existing)?;

        let base = match changes.title.as_deref() {
            Some(title) => slugify(title),
            None => existing.slug.clone(),
        };

        for attempt in 1..=MAX_SLUG_RETRIES {
            let new_slug = generate_unique_slug(&self.pool, &base, Some(&existing.slug)).await?;

            match post_repo::update_post(&self.pool, &existing.slug, &new_slug, &changes).await {
                Ok(Some(post)) => return Ok(post),
                Ok(None) => {
                    // Deleted out from under us after the fetch above.
                    return Err(AppError::NotFound("Post not found".to_string()));
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(
                        slug = %new_slug,
                        attempt,
                        "slug was taken by a concurrent write, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique slug, please retry".to_string(),
        ))
    }

    /// Delete the post addressed by `slug`. Author or admin only.
    pub async fn delete_post(&self, slug: &str, user: &AuthUser) -> Result<()> {
        let existing = post_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        permissions::check_post_access(user, &existing)?;

        post_repo::delete_post(&self.pool, &existing.slug).await?;
        Ok(())
    }

    /// Published posts ordered by composite popularity score.
    pub async fn top_posts(&self, limit: i64, offset: i64) -> Result<Vec<RankedPost>> {
        let posts = post_repo::top_posts(&self.pool, &self.ranking, limit, offset).await?;
        Ok(posts)
    }
}
