/// Business logic layer
///
/// - `slug`: slug derivation and unique-slug allocation
/// - `ranking`: composite popularity score
/// - `posts`: post lifecycle (create/update with slug retry, top listing)
/// - `users`: follow suggestions
pub mod posts;
pub mod ranking;
pub mod slug;
pub mod users;

pub use posts::PostService;
