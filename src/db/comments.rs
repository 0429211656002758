use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Comment, CommentView};
use crate::error::AppError;

pub struct CommentRepository;

impl CommentRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
        user_id: &str,
        text: String,
    ) -> Result<Comment, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let comment = sqlx::query_as::<_, Comment>(
            r#"
INSERT INTO comments (id, tweet_id, user_id, text, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(tweet_id)
        .bind(user_id)
        .bind(&text)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>, AppError> {
        let comment =
            sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ? AND tweet_id = ?")
                .bind(comment_id)
                .bind(tweet_id)
                .fetch_optional(pool)
                .await?;

        Ok(comment)
    }

    pub async fn delete(pool: &Pool<Sqlite>, comment_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Comments on a tweet with authors resolved, most recent first. Rowid
    /// order keeps same-second comments stable.
    pub async fn views_for_tweet(
        pool: &Pool<Sqlite>,
        tweet_id: &str,
    ) -> Result<Vec<CommentView>, AppError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
SELECT c.id, c.user_id, u.name, u.username, u.profile_image, c.text, c.created_at
FROM comments c
JOIN users u ON c.user_id = u.id
WHERE c.tweet_id = ?
ORDER BY c.rowid DESC
            "#,
        )
        .bind(tweet_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
