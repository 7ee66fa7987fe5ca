/// Feedback handlers: per-user post ratings with optional comments
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{feedback_repo, post_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::{permissions, AuthUser};
use crate::models::FeedbackWithAuthor;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub post_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPagination {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    pub success: bool,
    pub feedback: Vec<FeedbackWithAuthor>,
    pub pagination: FeedbackPagination,
}

/// Leave or revise feedback on a post. One row per (post, user): a repeat
/// submission updates the rating and comment in place.
pub async fn create_feedback(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if post_repo::find_post_id(&pool, req.post_id).await?.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let feedback = feedback_repo::upsert_feedback(
        &pool,
        req.post_id,
        user.id,
        req.rating,
        req.comment.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "feedback": feedback,
    })))
}

/// Paginated feedback for a post
pub async fn feedback_for_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve()?;

    let feedback =
        feedback_repo::feedback_for_post(&pool, *post_id, page.limit, page.offset()).await?;
    let total = feedback_repo::count_for_post(&pool, *post_id).await?;
    let total_pages = (total + page.limit - 1) / page.limit;

    Ok(HttpResponse::Ok().json(FeedbackListResponse {
        success: true,
        feedback,
        pagination: FeedbackPagination {
            total,
            page: page.page,
            total_pages,
            limit: page.limit,
        },
    }))
}

/// Mean rating of a post; 0 when nobody has rated it
pub async fn average_rating(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let average = feedback_repo::average_rating(&pool, *post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "post_id": *post_id,
        "average_rating": average,
    })))
}

/// Delete a feedback row. Only its author may do this.
pub async fn delete_feedback(
    pool: web::Data<PgPool>,
    user: AuthUser,
    feedback_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let existing = feedback_repo::find_by_id(&pool, *feedback_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    permissions::check_feedback_access(&user, &existing)?;

    feedback_repo::delete_feedback(&pool, *feedback_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "deleted": existing,
    })))
}
