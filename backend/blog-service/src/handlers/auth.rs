/// Authentication handlers: register, login, current profile
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::middleware::AuthUser;
use crate::security::password;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    pub avatar_url: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(min = 3, max = 32))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

fn default_avatar_url(username: &str) -> String {
    format!(
        "https://api.dicebear.com/8.x/shapes/svg?seed={}",
        urlencoding::encode(username)
    )
}

/// Register a new account and log it in
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if user_repo::username_or_email_taken(&pool, &req.username, &req.email).await? {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let avatar_url = default_avatar_url(&req.username);

    let user =
        match user_repo::create_user(&pool, &req.username, &req.email, &password_hash, &avatar_url)
            .await
        {
            Ok(user) => user,
            // Lost a race against a concurrent registration of the same name.
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict("User already exists".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

    let token = auth_core::jwt::generate_access_token(user.id, &user.username, &user.role)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User created",
        "token": token,
        "user": user,
    })))
}

/// Exchange credentials for an access token
pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    let user = user_repo::find_by_email(&pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth_core::jwt::generate_access_token(user.id, &user.username, &user.role)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user": user,
    })))
}

/// Current account's profile
pub async fn me(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let profile = user_repo::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Partial profile update
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<ProfileUpdateRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if req.username.is_some() || req.email.is_some() {
        let taken = user_repo::username_or_email_taken_by_other(
            &pool,
            req.username.as_deref(),
            req.email.as_deref(),
            user.id,
        )
        .await?;
        if taken {
            return Err(AppError::Conflict(
                "Username or email already in use".to_string(),
            ));
        }
    }

    let updated = user_repo::update_profile(
        &pool,
        user.id,
        req.avatar_url.as_deref(),
        req.bio.as_deref(),
        req.username.as_deref(),
        req.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile updated",
        "user": updated,
    })))
}
