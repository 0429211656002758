use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{User, UserCard};
use crate::error::AppError;

/// Partial profile update; `None` fields keep their stored value.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
}

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        name: String,
        username: String,
        email: String,
        password_hash: String,
        profile_image: String,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let user = sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (id, name, username, email, password_hash, profile_image, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&profile_image)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(pool: &Pool<Sqlite>, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(pool: &Pool<Sqlite>, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    /// Case-insensitive substring match on display name or username.
    pub async fn search(pool: &Pool<Sqlite>, query: &str) -> Result<Vec<UserCard>, AppError> {
        let pattern = format!("%{}%", query);

        let users = sqlx::query_as::<_, UserCard>(
            r#"
SELECT id, name, username, profile_image, bio
FROM users
WHERE name LIKE ? OR username LIKE ?
ORDER BY username
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    pub async fn update_profile(
        pool: &Pool<Sqlite>,
        id: &str,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
UPDATE users
SET name = COALESCE(?, name),
    bio = COALESCE(?, bio),
    location = COALESCE(?, location),
    website = COALESCE(?, website),
    profile_image = COALESCE(?, profile_image),
    cover_image = COALESCE(?, cover_image)
WHERE id = ?
RETURNING *
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.bio)
        .bind(&changes.location)
        .bind(&changes.website)
        .bind(&changes.profile_image)
        .bind(&changes.cover_image)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }
}
