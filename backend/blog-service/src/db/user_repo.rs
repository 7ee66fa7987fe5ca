use crate::models::{PublicUser, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, avatar_url, bio, created_at, updated_at";

/// Insert a new account with the default role
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    avatar_url: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, avatar_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, password_hash, role, avatar_url, bio,
                  created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(avatar_url)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Find an account by email (login path)
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find an account by id
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Public profile of an account
pub async fn find_public_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PublicUser>, sqlx::Error> {
    let user = sqlx::query_as::<_, PublicUser>(
        "SELECT id, username, avatar_url, bio FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Whether a username or email is already registered
pub async fn username_or_email_taken(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let row: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM users WHERE username = $1 OR email = $2")
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

/// Whether a username or email is registered to someone other than `user_id`
pub async fn username_or_email_taken_by_other(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM users
        WHERE (username = $1 OR email = $2) AND id <> $3
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Partial profile update; empty strings leave the stored value in place
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    avatar_url: Option<&str>,
    bio: Option<&str>,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET avatar_url = COALESCE(NULLIF($1, ''), avatar_url),
            bio = COALESCE(NULLIF($2, ''), bio),
            username = COALESCE($3, username),
            email = COALESCE($4, email),
            updated_at = NOW()
        WHERE id = $5
        RETURNING id, username, email, password_hash, role, avatar_url, bio,
                  created_at, updated_at
        "#,
    )
    .bind(avatar_url)
    .bind(bio)
    .bind(username)
    .bind(email)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Ids of everyone the user follows
pub async fn following_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        "SELECT following_id FROM follows WHERE follower_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Accounts followed by the user's followees, excluding the user
pub async fn friends_of_friends(
    pool: &PgPool,
    user_id: Uuid,
    followee_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT DISTINCT following_id FROM follows
        WHERE follower_id = ANY($1) AND following_id <> $2
        "#,
    )
    .bind(followee_ids)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// The most-followed accounts, excluding the user
pub async fn most_followed(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT users.id FROM users
        LEFT JOIN follows ON users.id = follows.following_id
        WHERE users.id <> $1
        GROUP BY users.id
        ORDER BY COUNT(follows.follower_id) DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Public profiles for a set of ids
pub async fn public_users_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<PublicUser>, sqlx::Error> {
    let users = sqlx::query_as::<_, PublicUser>(
        "SELECT id, username, avatar_url, bio FROM users WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
