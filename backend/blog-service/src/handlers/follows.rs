/// Follow handlers: directed follower edges between accounts
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;

/// Follow an account. Duplicate follows are no-ops.
pub async fn follow_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if user.id == *target_id {
        return Err(AppError::BadRequest(
            "You cannot follow yourself".to_string(),
        ));
    }

    if user_repo::find_public_by_id(&pool, *target_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    follow_repo::create_follow(&pool, user.id, *target_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Followed successfully"
    })))
}

/// Unfollow an account. Unfollowing someone you don't follow is a no-op.
pub async fn unfollow_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    follow_repo::delete_follow(&pool, user.id, *target_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Unfollowed successfully"
    })))
}

/// Whether the caller follows the given account
pub async fn follow_status(
    pool: web::Data<PgPool>,
    user: AuthUser,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let is_following = follow_repo::is_following(&pool, user.id, *target_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "isFollowing": is_following
    })))
}

/// Everyone following the given account
pub async fn followers(pool: web::Data<PgPool>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let users = follow_repo::followers_of(&pool, *user_id).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Everyone the given account follows
pub async fn following(pool: web::Data<PgPool>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let users = follow_repo::following_of(&pool, *user_id).await?;
    Ok(HttpResponse::Ok().json(users))
}
