use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Notification, NotificationKind, NotificationView};
use crate::error::AppError;

pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        recipient_id: &str,
        sender_id: &str,
        kind: NotificationKind,
        tweet_id: Option<&str>,
        comment_id: Option<&str>,
    ) -> Result<Notification, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let notification = sqlx::query_as::<_, Notification>(
            r#"
INSERT INTO notifications (id, recipient_id, sender_id, kind, tweet_id, comment_id, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(recipient_id)
        .bind(sender_id)
        .bind(kind.as_str())
        .bind(tweet_id)
        .bind(comment_id)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Notification>, AppError> {
        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(notification)
    }

    /// The recipient's 50 most recent notifications, newest first, with
    /// sender identity and tweet text joined for display. The tweet join is
    /// LEFT so notifications survive their tweet's deletion.
    pub async fn list_for(
        pool: &Pool<Sqlite>,
        recipient_id: &str,
    ) -> Result<Vec<NotificationView>, AppError> {
        let notifications = sqlx::query_as::<_, NotificationView>(
            r#"
SELECT n.id, n.recipient_id, n.sender_id,
       u.name AS sender_name, u.username AS sender_username,
       u.profile_image AS sender_profile_image,
       n.kind, n.tweet_id, t.text AS tweet_text, n.comment_id,
       n.is_read, n.created_at
FROM notifications n
JOIN users u ON n.sender_id = u.id
LEFT JOIN tweets t ON n.tweet_id = t.id
WHERE n.recipient_id = ?
ORDER BY n.rowid DESC
LIMIT 50
            "#,
        )
        .bind(recipient_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    pub async fn unread_count(pool: &Pool<Sqlite>, recipient_id: &str) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub async fn mark_read(pool: &Pool<Sqlite>, id: &str) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = 1 WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(pool: &Pool<Sqlite>, recipient_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE recipient_id = ? AND is_read = 0")
            .bind(recipient_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
