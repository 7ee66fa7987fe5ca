/// Search handlers
///
/// Two surfaces: a quick substring search feeding the header search box,
/// and a full-text search over published posts.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::db::search_repo;
use crate::error::{AppError, Result};

const QUICK_SEARCH_LIMIT: i64 = 5;
const FULLTEXT_SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct QuickSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FulltextSearchQuery {
    pub query: Option<String>,
}

/// Substring search over post titles/content and usernames
pub async fn quick_search(
    pool: web::Data<PgPool>,
    query: web::Query<QuickSearchQuery>,
) -> Result<HttpResponse> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search term is required".to_string()))?;

    let pattern = format!("%{}%", term);

    let (posts, users) = tokio::try_join!(
        search_repo::quick_search_posts(&pool, &pattern, QUICK_SEARCH_LIMIT),
        search_repo::quick_search_users(&pool, &pattern, QUICK_SEARCH_LIMIT),
    )?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "posts": posts,
        "users": users,
    })))
}

/// Full-text search over published posts
pub async fn fulltext_search(
    pool: web::Data<PgPool>,
    query: web::Query<FulltextSearchQuery>,
) -> Result<HttpResponse> {
    let term = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query is required".to_string()))?;

    let hits = search_repo::fulltext_search_posts(&pool, term, FULLTEXT_SEARCH_LIMIT).await?;

    Ok(HttpResponse::Ok().json(hits))
}
