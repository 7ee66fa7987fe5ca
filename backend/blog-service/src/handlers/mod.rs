/// HTTP request handlers and route configuration
pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod feedback;
pub mod follows;
pub mod posts;
pub mod search;
pub mod users;

use actix_web::web;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Pagination query parameters as they arrive on the wire.
///
/// Non-numeric values already fail Query extraction with a 400; this type
/// rejects the rest (zero or negative values) before any query executes.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated pagination, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl PageQuery {
    pub fn resolve(&self) -> Result<Page> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(10);

        if page < 1 || limit < 1 {
            return Err(AppError::Validation(
                "Invalid pagination parameters".to_string(),
            ));
        }

        Ok(Page { page, limit })
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Mount every `/api` route. The caller registers `web::Data<PgPool>` and
/// `web::Data<RankingConfig>` on the App.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me))
                    .route("/profile", web::put().to(auth::update_profile)),
            )
            .service(
                web::scope("/posts")
                    .route("/latest", web::get().to(posts::latest_posts))
                    .route("/top", web::get().to(posts::top_posts))
                    .route("/me", web::get().to(posts::my_posts))
                    .route("/user/{id}", web::get().to(posts::posts_by_user))
                    .route("/following/posts", web::get().to(posts::followed_posts))
                    .route("/{slug}/view", web::post().to(posts::record_view))
                    .service(
                        web::resource("")
                            .route(web::get().to(posts::list_posts))
                            .route(web::post().to(posts::create_post)),
                    )
                    .service(
                        web::resource("/{slug}")
                            .route(web::get().to(posts::get_post))
                            .route(web::put().to(posts::update_post))
                            .route(web::delete().to(posts::delete_post)),
                    ),
            )
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create_comment))
                    .service(
                        // GET lists a post's comments; PATCH/DELETE address a
                        // comment id. Same path shape, different meaning per method.
                        web::resource("/{id}")
                            .route(web::get().to(comments::comments_for_post))
                            .route(web::patch().to(comments::update_comment))
                            .route(web::delete().to(comments::delete_comment)),
                    ),
            )
            .service(
                web::scope("/feedback")
                    .route("", web::post().to(feedback::create_feedback))
                    .route(
                        "/post/{post_id}/average",
                        web::get().to(feedback::average_rating),
                    )
                    .service(
                        // GET takes a post id, DELETE a feedback id.
                        web::resource("/post/{id}")
                            .route(web::get().to(feedback::feedback_for_post))
                            .route(web::delete().to(feedback::delete_feedback)),
                    ),
            )
            .service(
                web::scope("/follow")
                    .route("/{id}/status", web::get().to(follows::follow_status))
                    .route("/{id}/followers", web::get().to(follows::followers))
                    .route("/{id}/following", web::get().to(follows::following))
                    .service(
                        web::resource("/{id}")
                            .route(web::post().to(follows::follow_user))
                            .route(web::delete().to(follows::unfollow_user)),
                    ),
            )
            .service(
                web::scope("/users")
                    .route("/suggestions/get", web::get().to(users::suggestions))
                    .route("/{id}", web::get().to(users::get_user)),
            )
            .service(
                web::scope("/search")
                    .route("", web::get().to(search::quick_search))
                    .route("/posts", web::get().to(search::fulltext_search)),
            )
            .service(web::scope("/dashboard").route("", web::get().to(dashboard::summary))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let page = PageQuery {
            page: None,
            limit: None,
        }
        .resolve()
        .unwrap();
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let page = PageQuery {
            page: Some(3),
            limit: Some(10),
        }
        .resolve()
        .unwrap();
        assert_eq!(page.offset(), 20);

        let page = PageQuery {
            page: Some(1),
            limit: Some(10),
        }
        .resolve()
        .unwrap();
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn zero_and_negative_values_are_rejected() {
        assert!(PageQuery {
            page: Some(0),
            limit: Some(10)
        }
        .resolve()
        .is_err());
        assert!(PageQuery {
            page: Some(1),
            limit: Some(-1)
        }
        .resolve()
        .is_err());
        assert!(PageQuery {
            page: Some(-5),
            limit: None
        }
        .resolve()
        .is_err());
    }
}
