/// Author dashboard: aggregate stats over the caller's posts
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::db::{feedback_repo, post_repo};
use crate::error::Result;
use crate::middleware::AuthUser;

const TITLE_PREVIEW_CHARS: usize = 12;

#[derive(Debug, Serialize)]
pub struct PostViews {
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_views: i64,
    pub post_count: usize,
    pub avg_rating: f64,
    pub views_per_post: Vec<PostViews>,
}

fn preview_title(title: &str) -> String {
    if title.chars().count() > TITLE_PREVIEW_CHARS {
        let prefix: String = title.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{}...", prefix)
    } else {
        title.to_string()
    }
}

pub async fn summary(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let posts = post_repo::author_post_views(&pool, user.id).await?;
    let avg_rating = feedback_repo::author_average_rating(&pool, user.id).await?;

    let total_views: i64 = posts.iter().map(|(_, views)| views).sum();
    let post_count = posts.len();
    let views_per_post = posts
        .iter()
        .map(|(title, views)| PostViews {
            title: preview_title(title),
            views: *views,
        })
        .collect();

    Ok(HttpResponse::Ok().json(DashboardResponse {
        total_views,
        post_count,
        avg_rating: (avg_rating * 100.0).round() / 100.0,
        views_per_post,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(preview_title("Short"), "Short");
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        assert_eq!(
            preview_title("A title well beyond twelve chars"),
            "A title well..."
        );
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let title = "ééééééééééééé";
        let preview = preview_title(title);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), TITLE_PREVIEW_CHARS + 3);
    }
}
