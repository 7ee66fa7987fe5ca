/// User profile handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::users::{merge_suggestion_candidates, SUGGESTION_LIMIT};

/// Public profile of an account
pub async fn get_user(pool: web::Data<PgPool>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let profile = user_repo::find_public_by_id(&pool, *user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Accounts the caller might want to follow: friends of friends first,
/// most-followed accounts as backfill.
pub async fn suggestions(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let following = user_repo::following_ids(&pool, user.id).await?;
    let friends_of_friends = user_repo::friends_of_friends(&pool, user.id, &following).await?;
    let popular = user_repo::most_followed(&pool, user.id, 20).await?;

    let candidate_ids =
        merge_suggestion_candidates(&following, friends_of_friends, popular, SUGGESTION_LIMIT);

    if candidate_ids.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "users": [] })));
    }

    let users = user_repo::public_users_by_ids(&pool, &candidate_ids).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "users": users })))
}
