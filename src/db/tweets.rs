use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Tweet, TweetView, UserCard};
use crate::db::{CommentRepository, LikeRepository};
use crate::error::AppError;

pub struct TweetRepository;

impl TweetRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: &str,
        text: String,
        media: String,
    ) -> Result<Tweet, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
INSERT INTO tweets (id, user_id, text, media, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&text)
        .bind(&media)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(tweet)
    }

    pub async fn get_by_id(pool: &Pool<Sqlite>, id: &str) -> Result<Option<Tweet>, AppError> {
        let tweet = sqlx::query_as::<_, Tweet>("SELECT * FROM tweets WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tweet)
    }

    /// Remove a tweet with its likes and comments in one transaction.
    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE tweet_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM comments WHERE tweet_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tweets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list_recent(pool: &Pool<Sqlite>) -> Result<Vec<Tweet>, AppError> {
        let tweets = sqlx::query_as::<_, Tweet>(
            "SELECT * FROM tweets ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(tweets)
    }

    pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: &str) -> Result<Vec<Tweet>, AppError> {
        let tweets = sqlx::query_as::<_, Tweet>(
            "SELECT * FROM tweets WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tweets)
    }

    /// Tweets authored by any of `user_ids`, newest first.
    pub async fn list_by_users(
        pool: &Pool<Sqlite>,
        user_ids: &[String],
    ) -> Result<Vec<Tweet>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            sqlx::QueryBuilder::<Sqlite>::new("SELECT * FROM tweets WHERE user_id IN (");
        let mut separated = builder.separated(", ");
        for id in user_ids {
            separated.push_bind(id);
        }
        builder.push(") ORDER BY created_at DESC, rowid DESC");

        let tweets = builder.build_query_as::<Tweet>().fetch_all(pool).await?;

        Ok(tweets)
    }

    /// Resolve a tweet for display: author card, like list, comments.
    pub async fn to_view(pool: &Pool<Sqlite>, tweet: Tweet) -> Result<TweetView, AppError> {
        let author = sqlx::query_as::<_, UserCard>(
            "SELECT id, name, username, profile_image, bio FROM users WHERE id = ?",
        )
        .bind(&tweet.user_id)
        .fetch_one(pool)
        .await?;

        let likes = LikeRepository::user_ids(pool, &tweet.id).await?;
        let comments = CommentRepository::views_for_tweet(pool, &tweet.id).await?;

        Ok(TweetView {
            id: tweet.id,
            user: author,
            text: tweet.text,
            media: tweet.media,
            likes,
            comments,
            created_at: tweet.created_at,
        })
    }

    pub async fn to_views(
        pool: &Pool<Sqlite>,
        tweets: Vec<Tweet>,
    ) -> Result<Vec<TweetView>, AppError> {
        let mut views = Vec::with_capacity(tweets.len());
        for tweet in tweets {
            views.push(Self::to_view(pool, tweet).await?);
        }

        Ok(views)
    }
}
