use sqlx::{Pool, Sqlite};

use crate::db::models::UserCard;
use crate::error::{is_unique_violation, AppError};

/// Directed follow edges. One row per edge; followers and following are the
/// two query directions of the same table, so both "lists" move together.
pub struct FollowRepository;

impl FollowRepository {
    /// Insert the edge. The primary key turns a racing duplicate into a
    /// `Conflict` instead of a second row.
    pub async fn create(
        pool: &Pool<Sqlite>,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<(), AppError> {
        let created_at = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .bind(created_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("You are already following this user".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(())
    }

    /// Remove the edge; reports whether it existed.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
            .bind(follower_id)
            .bind(followee_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(
        pool: &Pool<Sqlite>,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM follows WHERE follower_id = ? AND followee_id = ?",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }

    /// Users following `user_id`, most recent follower first.
    pub async fn followers_of(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<UserCard>, AppError> {
        let followers = sqlx::query_as::<_, UserCard>(
            r#"
SELECT u.id, u.name, u.username, u.profile_image, u.bio
FROM follows f
JOIN users u ON f.follower_id = u.id
WHERE f.followee_id = ?
ORDER BY f.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(followers)
    }

    /// Users that `user_id` follows, most recently followed first.
    pub async fn following_of(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<UserCard>, AppError> {
        let following = sqlx::query_as::<_, UserCard>(
            r#"
SELECT u.id, u.name, u.username, u.profile_image, u.bio
FROM follows f
JOIN users u ON f.followee_id = u.id
WHERE f.follower_id = ?
ORDER BY f.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(following)
    }

    /// Ids of everyone `user_id` follows; feeds the timeline query.
    pub async fn following_ids(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT followee_id FROM follows WHERE follower_id = ?")
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn follower_count(pool: &Pool<Sqlite>, user_id: &str) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM follows WHERE followee_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    pub async fn following_count(pool: &Pool<Sqlite>, user_id: &str) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
