/// Slug derivation and unique-slug allocation
///
/// A slug is the URL-safe identifier of a post, derived from its title.
/// Uniqueness is checked against the post store; the store's UNIQUE
/// constraint on `posts.slug` remains the final authority, so callers of
/// `generate_unique_slug` must treat a unique-violation on the following
/// INSERT/UPDATE as a lost race and retry (see `PostService`).
use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};

/// Upper bound on suffix probing for one allocation. Far above any
/// realistic collision count; hitting it means something is wrong with
/// the store, not with the title.
pub const MAX_SLUG_PROBES: u32 = 1000;

/// Derive a URL-safe slug from a title.
///
/// Lower-cases the input, collapses every maximal run of characters
/// outside `[a-z0-9]` into a single hyphen, and strips leading and
/// trailing hyphens. Deterministic and idempotent; an empty or
/// all-punctuation title yields the empty string (rejected upstream by
/// request validation).
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Source of truth for which slugs are already taken.
///
/// Abstracted so the allocation loop is testable without a live store;
/// production uses the `PgPool` implementation below.
#[async_trait]
pub trait SlugStore {
    /// Whether `candidate` is held by any post other than the one with
    /// slug `exclude` (the caller's own post during updates).
    async fn slug_taken(&self, candidate: &str, exclude: Option<&str>) -> Result<bool>;
}

#[async_trait]
impl SlugStore for PgPool {
    async fn slug_taken(&self, candidate: &str, exclude: Option<&str>) -> Result<bool> {
        let row: Option<i32> = match exclude {
            Some(current) => {
                sqlx::query_scalar("SELECT 1 FROM posts WHERE slug = $1 AND slug <> $2")
                    .bind(candidate)
                    .bind(current)
                    .fetch_optional(self)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT 1 FROM posts WHERE slug = $1")
                    .bind(candidate)
                    .fetch_optional(self)
                    .await?
            }
        };

        Ok(row.is_some())
    }
}

/// Allocate a slug not currently held by any other post.
///
/// Starts from `base` and probes `base`, `base-1`, `base-2`, ... until a
/// free candidate is found. `exclude` is the post's own current slug
/// during updates, so an unchanged title keeps its slug.
pub async fn generate_unique_slug<S: SlugStore + ?Sized>(
    store: &S,
    base: &str,
    exclude: Option<&str>,
) -> Result<String> {
    let mut candidate = base.to_string();
    let mut suffix: u32 = 1;

    while store.slug_taken(&candidate, exclude).await? {
        if suffix > MAX_SLUG_PROBES {
            return Err(AppError::Internal(format!(
                "Gave up allocating a slug for '{}' after {} probes",
                base, MAX_SLUG_PROBES
            )));
        }
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory stand-in for the posts table.
    struct MemStore {
        slugs: Mutex<HashSet<String>>,
    }

    impl MemStore {
        fn new(existing: &[&str]) -> Self {
            Self {
                slugs: Mutex::new(existing.iter().map(|s| s.to_string()).collect()),
            }
        }

        fn insert(&self, slug: &str) {
            self.slugs.lock().unwrap().insert(slug.to_string());
        }
    }

    #[async_trait]
    impl SlugStore for MemStore {
        async fn slug_taken(&self, candidate: &str, exclude: Option<&str>) -> Result<bool> {
            if exclude == Some(candidate) {
                return Ok(false);
            }
            Ok(self.slugs.lock().unwrap().contains(candidate))
        }
    }

    #[test]
    fn slugify_known_titles() {
        assert_eq!(slugify("My Test Blog"), "my-test-blog");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & PostgreSQL -- a love story  "), "rust-postgresql-a-love-story");
        assert_eq!(slugify("100 Days of Code"), "100-days-of-code");
    }

    #[test]
    fn slugify_collapses_runs_and_trims_hyphens() {
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in ["My Test Blog", "a--b", "Déjà vu", "100%"] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once);
        }
    }

    #[tokio::test]
    async fn allocates_increasing_suffixes_against_a_growing_store() {
        let store = MemStore::new(&[]);

        let mut allocated = Vec::new();
        for _ in 0..4 {
            let slug = generate_unique_slug(&store, "my-test-blog", None)
                .await
                .unwrap();
            store.insert(&slug);
            allocated.push(slug);
        }

        assert_eq!(
            allocated,
            vec!["my-test-blog", "my-test-blog-1", "my-test-blog-2", "my-test-blog-3"]
        );
    }

    #[tokio::test]
    async fn skips_over_existing_suffixes() {
        let store = MemStore::new(&["post", "post-1"]);
        let slug = generate_unique_slug(&store, "post", None).await.unwrap();
        assert_eq!(slug, "post-2");
    }

    #[tokio::test]
    async fn excluded_slug_is_kept_on_update() {
        let store = MemStore::new(&["my-test-blog"]);
        let slug = generate_unique_slug(&store, "my-test-blog", Some("my-test-blog"))
            .await
            .unwrap();
        assert_eq!(slug, "my-test-blog");
    }

    #[tokio::test]
    async fn exclusion_does_not_leak_to_other_posts() {
        let store = MemStore::new(&["taken"]);
        let slug = generate_unique_slug(&store, "taken", Some("something-else"))
            .await
            .unwrap();
        assert_eq!(slug, "taken-1");
    }
}
