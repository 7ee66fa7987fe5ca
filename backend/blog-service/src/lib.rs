/// Blog Service Library
///
/// REST backend for the devlog blogging platform: authentication, posts,
/// comments, feedback, follows, and search over PostgreSQL.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route configuration
/// - `models`: Data structures for users, posts, comments, feedback
/// - `services`: Business logic layer (slug allocation, ranking, suggestions)
/// - `db`: Database access layer and repositories
/// - `middleware`: Request authentication and permission checks
/// - `security`: Password hashing
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
