/// Database access layer
///
/// Repository functions over `&PgPool`, one module per aggregate. All SQL
/// is parameterized; errors bubble up as `sqlx::Error` so callers can
/// distinguish constraint violations from other failures.
pub mod comment_repo;
pub mod feedback_repo;
pub mod follow_repo;
pub mod post_repo;
pub mod search_repo;
pub mod user_repo;
