/// OpenAPI documentation for the Devlog Blog Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Devlog Blog Service API",
        version = "0.1.0",
        description = "REST backend for the devlog blogging platform. Handles accounts, posts with unique URL slugs, threaded comments, per-user feedback ratings, follow relationships, search, and a composite-score top-posts ranking.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:4000", description = "Development server"),
    ),
    tags(
        (name = "auth", description = "Registration, login, and profile management"),
        (name = "posts", description = "Post creation, retrieval, updates, deletion, and rankings"),
        (name = "comments", description = "Threaded comments on posts"),
        (name = "feedback", description = "Per-user post ratings with optional comments"),
        (name = "follow", description = "Follower relationships between accounts"),
        (name = "search", description = "Quick and full-text search"),
    ),
    components(schemas(
        crate::models::User,
        crate::models::PublicUser,
        crate::models::Post,
        crate::models::RankedPost,
        crate::models::PostSummary,
        crate::models::SearchHit,
        crate::models::Comment,
        crate::models::CommentWithAuthor,
        crate::models::Feedback,
        crate::models::FeedbackWithAuthor,
    )),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}
