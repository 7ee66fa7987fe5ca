/// Comment handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::{permissions, AuthUser};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// Create a comment, optionally replying to a parent comment
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if post_repo::find_post_id(&pool, req.post_id).await?.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let comment = comment_repo::create_comment(
        &pool,
        req.post_id,
        user.id,
        &req.content,
        req.parent_comment_id,
    )
    .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// All comments on a post with author usernames, oldest first
pub async fn comments_for_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = comment_repo::comments_for_post(&pool, *post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Edit a comment. Author or admin only.
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let existing = comment_repo::find_by_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    permissions::check_comment_access(&user, &existing)?;

    let updated = comment_repo::update_comment(&pool, *comment_id, &req.content).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a comment. Author or admin only.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let existing = comment_repo::find_by_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    permissions::check_comment_access(&user, &existing)?;

    comment_repo::delete_comment(&pool, *comment_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment deleted"
    })))
}
