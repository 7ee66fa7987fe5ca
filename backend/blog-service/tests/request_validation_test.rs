//! Boundary validation tests
//!
//! These run against the real route table with a lazily-connected pool that
//! has no database behind it: any request that reaches a repository would
//! fail with a connection error (500), so a 400/401 here proves the request
//! was rejected before any query executed.

use actix_web::{http::StatusCode, test, web, App};
use blog_service::config::RankingConfig;
use blog_service::handlers;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/devlog_validation_test")
        .expect("lazy pool construction does not touch the network")
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(RankingConfig::default()))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn top_posts_rejects_zero_page() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/posts/top?page=0&limit=10")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn top_posts_rejects_negative_limit() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/posts/top?page=1&limit=-1")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn top_posts_rejects_non_numeric_page() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/posts/top?page=abc&limit=10")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn feedback_listing_rejects_invalid_pagination() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/feedback/post/00000000-0000-0000-0000-000000000000?page=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn creating_a_post_requires_a_bearer_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(serde_json::json!({
            "title": "My Test Blog",
            "content": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_bearer_token_is_rejected() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .set_json(serde_json::json!({
            "title": "My Test Blog",
            "content": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn quick_search_requires_a_term() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/search").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/search?q=%20%20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn fulltext_search_requires_a_query() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/search/posts")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
