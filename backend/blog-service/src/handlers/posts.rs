/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::RankingConfig;
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::AuthUser;
use crate::services::posts::{NewPost, PostChanges};
use crate::services::slug::slugify;
use crate::services::PostService;

/// A title must leave something behind once slugified; "!!!" would
/// otherwise produce an empty slug.
fn check_title_sluggable(title: &str) -> Result<()> {
    if slugify(title).is_empty() {
        return Err(AppError::Validation(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub is_published: Option<bool>,
}

fn service(pool: &web::Data<PgPool>, ranking: &web::Data<RankingConfig>) -> PostService {
    PostService::new(pool.get_ref().clone(), ranking.get_ref().clone())
}

/// Create a new post under a freshly generated slug
pub async fn create_post(
    pool: web::Data<PgPool>,
    ranking: web::Data<RankingConfig>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    check_title_sluggable(&req.title)?;

    let req = req.into_inner();
    let post = service(&pool, &ranking)
        .create_post(
            user.id,
            NewPost {
                title: req.title,
                content: req.content,
                description: req.description,
                tags: req.tags.unwrap_or_default(),
                cover_image: req.cover_image,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Update a post; the slug may change when the title does
pub async fn update_post(
    pool: web::Data<PgPool>,
    ranking: web::Data<RankingConfig>,
    user: AuthUser,
    slug: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    if let Some(title) = req.title.as_deref() {
        check_title_sluggable(title)?;
    }

    let req = req.into_inner();
    let post = service(&pool, &ranking)
        .update_post(
            &slug,
            &user,
            PostChanges {
                title: req.title,
                content: req.content,
                description: req.description,
                tags: req.tags,
                cover_image: req.cover_image,
                is_published: req.is_published,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post
pub async fn delete_post(
    pool: web::Data<PgPool>,
    ranking: web::Data<RankingConfig>,
    user: AuthUser,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    service(&pool, &ranking).delete_post(&slug, &user).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post deleted successfully"
    })))
}

/// All posts, newest first
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts = post_repo::list_recent(&pool, page.limit, page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Published posts, newest first
pub async fn latest_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts = post_repo::list_published_recent(&pool, page.limit, page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Published posts ordered by composite popularity score
pub async fn top_posts(
    pool: web::Data<PgPool>,
    ranking: web::Data<RankingConfig>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts = service(&pool, &ranking)
        .top_posts(page.limit, page.offset())
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// The caller's posts, drafts included
pub async fn my_posts(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts = post_repo::list_all_by_author(&pool, user.id, page.limit, page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Published posts by one author
pub async fn posts_by_user(
    pool: web::Data<PgPool>,
    author_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts =
        post_repo::list_published_by_author(&pool, *author_id, page.limit, page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Published posts authored by accounts the caller follows
pub async fn followed_posts(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;
    let posts = post_repo::list_followed_posts(&pool, user.id, page.limit, page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Record one view of a post
pub async fn record_view(pool: web::Data<PgPool>, slug: web::Path<String>) -> Result<HttpResponse> {
    if !post_repo::increment_view_count(&pool, &slug).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "View recorded"
    })))
}

/// Fetch a post by slug
pub async fn get_post(pool: web::Data<PgPool>, slug: web::Path<String>) -> Result<HttpResponse> {
    let post = post_repo::find_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsluggable_title_is_rejected() {
        assert!(check_title_sluggable("!!!").is_err());
        assert!(check_title_sluggable("My Test Blog").is_ok());
    }

    #[test]
    fn create_request_rejects_empty_title() {
        let req = CreatePostRequest {
            title: String::new(),
            content: "body".to_string(),
            description: None,
            tags: None,
            cover_image: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_accepts_ordinary_title() {
        let req = CreatePostRequest {
            title: "My Test Blog".to_string(),
            content: "body".to_string(),
            description: None,
            tags: Some(vec!["rust".to_string()]),
            cover_image: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_request_allows_all_fields_absent() {
        let req = UpdatePostRequest {
            title: None,
            content: None,
            description: None,
            tags: None,
            cover_image: None,
            is_published: None,
        };
        assert!(req.validate().is_ok());
    }
}
