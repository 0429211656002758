use sqlx::{Pool, Sqlite};

use crate::error::{is_unique_violation, AppError};

pub struct LikeRepository;

impl LikeRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let created_at = chrono::Utc::now().timestamp();

        sqlx::query("INSERT INTO likes (tweet_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(tweet_id)
            .bind(user_id)
            .bind(created_at)
            .execute(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Tweet already liked".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(())
    }

    pub async fn delete(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE tweet_id = ? AND user_id = ?")
            .bind(tweet_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM likes WHERE tweet_id = ? AND user_id = ?")
                .bind(tweet_id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.is_some())
    }

    /// User ids that liked the tweet, most recent first. Ordered by rowid so
    /// same-second likes keep their insertion order.
    pub async fn user_ids(pool: &Pool<Sqlite>, tweet_id: &str) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT user_id FROM likes WHERE tweet_id = ? ORDER BY rowid DESC")
                .bind(tweet_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
