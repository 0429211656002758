//! Social-graph mutations and the notification fan-out they trigger.
//!
//! Every operation takes the acting identity explicitly, re-checks its
//! preconditions against current state before touching anything, and only
//! then mutates. Duplicate checks are part of the contract: a follow or like
//! that already exists answers `Conflict`, never a silent success.

use sqlx::{Pool, Sqlite};

use crate::db::models::{Notification, NotificationKind, NotificationView};
use crate::db::{
    CommentRepository, CommentView, FollowRepository, LikeRepository, NotificationRepository,
    TweetRepository, UserRepository,
};
use crate::error::AppError;

/// The authenticated identity performing an operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

/// Follow `target_id` on behalf of `actor_id` and notify the target.
///
/// The edge row is the single source of truth for both relationship
/// directions, so the paired list update is atomic by construction. A racing
/// duplicate that passes the precondition check still loses on the edge's
/// primary key and surfaces as `Conflict`.
pub async fn follow(
    pool: &Pool<Sqlite>,
    actor_id: &str,
    target_id: &str,
) -> Result<(), AppError> {
    if actor_id == target_id {
        return Err(AppError::InvalidOperation(
            "You cannot follow yourself".to_string(),
        ));
    }

    let target = UserRepository::get_by_id(pool, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if FollowRepository::exists(pool, actor_id, target_id).await? {
        return Err(AppError::Conflict(
            "You are already following this user".to_string(),
        ));
    }

    FollowRepository::create(pool, actor_id, target_id).await?;

    NotificationRepository::create(pool, &target.id, actor_id, NotificationKind::Follow, None, None)
        .await?;

    Ok(())
}

/// Remove the follow edge. No notification is sent for unfollows.
pub async fn unfollow(
    pool: &Pool<Sqlite>,
    actor_id: &str,
    target_id: &str,
) -> Result<(), AppError> {
    if actor_id == target_id {
        return Err(AppError::InvalidOperation(
            "You cannot unfollow yourself".to_string(),
        ));
    }

    UserRepository::get_by_id(pool, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let removed = FollowRepository::delete(pool, actor_id, target_id).await?;
    if !removed {
        return Err(AppError::Conflict(
            "You are not following this user".to_string(),
        ));
    }

    Ok(())
}

/// Like a tweet and return the updated like list, most recent liker first.
pub async fn like(
    pool: &Pool<Sqlite>,
    actor_id: &str,
    tweet_id: &str,
) -> Result<Vec<String>, AppError> {
    let tweet = TweetRepository::get_by_id(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if LikeRepository::exists(pool, tweet_id, actor_id).await? {
        return Err(AppError::Conflict("Tweet already liked".to_string()));
    }

    LikeRepository::create(pool, tweet_id, actor_id).await?;

    // Liking your own tweet is not news.
    if tweet.user_id != actor_id {
        NotificationRepository::create(
            pool,
            &tweet.user_id,
            actor_id,
            NotificationKind::Like,
            Some(tweet_id),
            None,
        )
        .await?;
    }

    LikeRepository::user_ids(pool, tweet_id).await
}

/// Withdraw a like and return the updated list. The like notification, once
/// sent, stays; notifications are an event log, not a mirror of state.
pub async fn unlike(
    pool: &Pool<Sqlite>,
    actor_id: &str,
    tweet_id: &str,
) -> Result<Vec<String>, AppError> {
    TweetRepository::get_by_id(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let removed = LikeRepository::delete(pool, tweet_id, actor_id).await?;
    if !removed {
        return Err(AppError::Conflict(
            "Tweet has not yet been liked".to_string(),
        ));
    }

    LikeRepository::user_ids(pool, tweet_id).await
}

/// Comment on a tweet and return the full comment list with authors
/// resolved, newest comment first.
pub async fn comment(
    pool: &Pool<Sqlite>,
    actor_id: &str,
    tweet_id: &str,
    text: &str,
) -> Result<Vec<CommentView>, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Comment text is required".to_string()));
    }
    if trimmed.chars().count() > 280 {
        return Err(AppError::Validation(
            "Comment cannot be more than 280 characters".to_string(),
        ));
    }

    let tweet = TweetRepository::get_by_id(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let created = CommentRepository::create(pool, tweet_id, actor_id, trimmed.to_string()).await?;

    if tweet.user_id != actor_id {
        NotificationRepository::create(
            pool,
            &tweet.user_id,
            actor_id,
            NotificationKind::Comment,
            Some(tweet_id),
            Some(&created.id),
        )
        .await?;
    }

    CommentRepository::views_for_tweet(pool, tweet_id).await
}

/// Delete one comment. Only the comment's author or an administrator may;
/// the rest of the list keeps its order.
pub async fn delete_comment(
    pool: &Pool<Sqlite>,
    actor: &Actor,
    tweet_id: &str,
    comment_id: &str,
) -> Result<Vec<CommentView>, AppError> {
    TweetRepository::get_by_id(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let target = CommentRepository::get_by_id(pool, tweet_id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment does not exist".to_string()))?;

    if target.user_id != actor.id && !actor.is_admin {
        return Err(AppError::Forbidden("User not authorized".to_string()));
    }

    CommentRepository::delete(pool, comment_id).await?;

    CommentRepository::views_for_tweet(pool, tweet_id).await
}

/// Delete a tweet with its embedded likes and comments. Notifications that
/// referenced the tweet remain; their display join tolerates the gap.
pub async fn delete_tweet(
    pool: &Pool<Sqlite>,
    actor: &Actor,
    tweet_id: &str,
) -> Result<(), AppError> {
    let tweet = TweetRepository::get_by_id(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if tweet.user_id != actor.id && !actor.is_admin {
        return Err(AppError::Forbidden("User not authorized".to_string()));
    }

    TweetRepository::delete(pool, tweet_id).await
}

/// The recipient's notifications, newest first, capped at 50.
pub async fn notifications_for(
    pool: &Pool<Sqlite>,
    recipient_id: &str,
) -> Result<Vec<NotificationView>, AppError> {
    NotificationRepository::list_for(pool, recipient_id).await
}

pub async fn unread_count(pool: &Pool<Sqlite>, recipient_id: &str) -> Result<i64, AppError> {
    NotificationRepository::unread_count(pool, recipient_id).await
}

/// Mark one notification read. Owned by someone else answers `Forbidden`;
/// marking an already-read notification succeeds silently.
pub async fn mark_notification_read(
    pool: &Pool<Sqlite>,
    recipient_id: &str,
    notification_id: &str,
) -> Result<Notification, AppError> {
    let notification = NotificationRepository::get_by_id(pool, notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    if notification.recipient_id != recipient_id {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    NotificationRepository::mark_read(pool, notification_id).await
}

/// Mark everything unread as read; a no-op with zero matches still succeeds.
pub async fn mark_all_notifications_read(
    pool: &Pool<Sqlite>,
    recipient_id: &str,
) -> Result<(), AppError> {
    NotificationRepository::mark_all_read(pool, recipient_id).await
}

pub async fn delete_notification(
    pool: &Pool<Sqlite>,
    recipient_id: &str,
    notification_id: &str,
) -> Result<(), AppError> {
    let notification = NotificationRepository::get_by_id(pool, notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    if notification.recipient_id != recipient_id {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    NotificationRepository::delete(pool, notification_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> Pool<Sqlite> {
        // Single connection: each in-memory SQLite connection is its own db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    async fn seed_user(pool: &Pool<Sqlite>, username: &str) -> String {
        UserRepository::create(
            pool,
            username.to_string(),
            username.to_string(),
            format!("{}@example.com", username),
            "hash".to_string(),
            String::new(),
        )
        .await
        .unwrap()
        .id
    }

    async fn make_admin(pool: &Pool<Sqlite>, user_id: &str) {
        sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?")
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn seed_tweet(pool: &Pool<Sqlite>, author_id: &str, text: &str) -> String {
        TweetRepository::create(pool, author_id, text.to_string(), String::new())
            .await
            .unwrap()
            .id
    }

    fn actor(id: &str) -> Actor {
        Actor {
            id: id.to_string(),
            is_admin: false,
        }
    }

    fn admin(id: &str) -> Actor {
        Actor {
            id: id.to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn follow_links_both_directions_and_notifies() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();

        let followers = FollowRepository::followers_of(&pool, &bob).await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, alice);

        let following = FollowRepository::following_of(&pool, &alice).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, bob);

        let notifications = notifications_for(&pool, &bob).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].sender_id, alice);
        assert_eq!(notifications[0].recipient_id, bob);
        assert_eq!(notifications[0].kind, "follow");
        assert!(!notifications[0].is_read);
    }

    #[tokio::test]
    async fn follow_self_is_rejected() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        let result = follow(&pool, &alice, &alice).await;
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));

        // Also rejected before existence is even checked.
        let result = follow(&pool, "no-such-id", "no-such-id").await;
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn follow_unknown_user_is_not_found() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        let result = follow(&pool, &alice, "no-such-id").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_follow_conflicts_and_leaves_state() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        let result = follow(&pool, &alice, &bob).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        assert_eq!(FollowRepository::follower_count(&pool, &bob).await.unwrap(), 1);
        assert_eq!(notifications_for(&pool, &bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unfollow_restores_both_lists() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        unfollow(&pool, &alice, &bob).await.unwrap();

        assert!(FollowRepository::followers_of(&pool, &bob).await.unwrap().is_empty());
        assert!(FollowRepository::following_of(&pool, &alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unfollow_without_edge_conflicts() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        let result = unfollow(&pool, &alice, &bob).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn unfollow_self_is_rejected() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        let result = unfollow(&pool, &alice, &alice).await;
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn likes_list_most_recent_first() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        let likes = like(&pool, &alice, &tweet).await.unwrap();
        assert_eq!(likes, vec![alice.clone()]);

        let likes = like(&pool, &carol, &tweet).await.unwrap();
        assert_eq!(likes, vec![carol.clone(), alice.clone()]);
    }

    #[tokio::test]
    async fn unlike_preserves_remaining_order() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let dave = seed_user(&pool, "dave").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();
        like(&pool, &carol, &tweet).await.unwrap();
        like(&pool, &dave, &tweet).await.unwrap();

        let likes = unlike(&pool, &carol, &tweet).await.unwrap();
        assert_eq!(likes, vec![dave, alice]);
    }

    #[tokio::test]
    async fn like_unlike_round_trip() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();
        let likes = unlike(&pool, &alice, &tweet).await.unwrap();
        assert!(likes.is_empty());
    }

    #[tokio::test]
    async fn duplicate_like_and_absent_unlike_conflict() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();
        assert!(matches!(
            like(&pool, &alice, &tweet).await,
            Err(AppError::Conflict(_))
        ));

        assert!(matches!(
            unlike(&pool, &bob, &tweet).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn like_unknown_tweet_is_not_found() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        assert!(matches!(
            like(&pool, &alice, "no-such-tweet").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            unlike(&pool, &alice, "no-such-tweet").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn own_like_does_not_notify() {
        let pool = test_pool().await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &bob, &tweet).await.unwrap();

        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 0);
        assert!(notifications_for(&pool, &bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn like_notifies_the_author() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();

        let notifications = notifications_for(&pool, &bob).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "like");
        assert_eq!(notifications[0].sender_id, alice);
        assert_eq!(notifications[0].tweet_id.as_deref(), Some(tweet.as_str()));
        assert_eq!(notifications[0].tweet_text.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn comment_prepends_and_notifies() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        comment(&pool, &bob, &tweet, "first").await.unwrap();
        let comments = comment(&pool, &alice, &tweet, "hi").await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "hi");
        assert_eq!(comments[0].username, "alice");
        assert_eq!(comments[1].text, "first");

        let notifications = notifications_for(&pool, &bob).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "comment");
        assert_eq!(notifications[0].sender_id, alice);
        assert_eq!(notifications[0].tweet_id.as_deref(), Some(tweet.as_str()));
        assert_eq!(
            notifications[0].comment_id.as_deref(),
            Some(comments[0].id.as_str())
        );
    }

    #[tokio::test]
    async fn own_comment_does_not_notify() {
        let pool = test_pool().await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        comment(&pool, &bob, &tweet, "me again").await.unwrap();

        assert!(notifications_for(&pool, &bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comment_text_is_validated_by_code_points() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        assert!(matches!(
            comment(&pool, &alice, &tweet, "   ").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            comment(&pool, &alice, &tweet, &"a".repeat(281)).await,
            Err(AppError::Validation(_))
        ));

        // 280 two-byte code points are fine; the limit is not in bytes.
        let comments = comment(&pool, &alice, &tweet, &"é".repeat(280)).await.unwrap();
        assert_eq!(comments[0].text.chars().count(), 280);
    }

    #[tokio::test]
    async fn delete_comment_keeps_order_of_the_rest() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        comment(&pool, &alice, &tweet, "one").await.unwrap();
        let after_two = comment(&pool, &alice, &tweet, "two").await.unwrap();
        comment(&pool, &alice, &tweet, "three").await.unwrap();

        let middle_id = after_two[0].id.clone();
        let comments = delete_comment(&pool, &actor(&alice), &tweet, &middle_id)
            .await
            .unwrap();

        let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "one"]);
    }

    #[tokio::test]
    async fn delete_comment_requires_author_or_admin() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let moderator = seed_user(&pool, "moderator").await;
        make_admin(&pool, &moderator).await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        let comments = comment(&pool, &alice, &tweet, "hi").await.unwrap();
        let comment_id = comments[0].id.clone();

        assert!(matches!(
            delete_comment(&pool, &actor(&carol), &tweet, &comment_id).await,
            Err(AppError::Forbidden(_))
        ));

        let remaining = delete_comment(&pool, &admin(&moderator), &tweet, &comment_id)
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn delete_comment_distinguishes_missing_tweet_and_comment() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        let err = delete_comment(&pool, &actor(&alice), "no-such-tweet", "x")
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::NotFound(msg) if msg.contains("Tweet")));

        let err = delete_comment(&pool, &actor(&alice), &tweet, "no-such-comment")
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::NotFound(msg) if msg.contains("Comment")));
    }

    #[tokio::test]
    async fn delete_tweet_removes_embedded_data() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();
        comment(&pool, &alice, &tweet, "hi").await.unwrap();

        delete_tweet(&pool, &actor(&bob), &tweet).await.unwrap();

        assert!(TweetRepository::get_by_id(&pool, &tweet).await.unwrap().is_none());
        assert!(LikeRepository::user_ids(&pool, &tweet).await.unwrap().is_empty());
        assert!(CommentRepository::views_for_tweet(&pool, &tweet)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_tweet_leaves_notifications_dangling_but_displayable() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let tweet = seed_tweet(&pool, &bob, "hello").await;

        like(&pool, &alice, &tweet).await.unwrap();
        delete_tweet(&pool, &actor(&bob), &tweet).await.unwrap();

        let notifications = notifications_for(&pool, &bob).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tweet_id.as_deref(), Some(tweet.as_str()));
        assert_eq!(notifications[0].tweet_text, None);
    }

    #[tokio::test]
    async fn delete_tweet_requires_author_or_admin() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let moderator = seed_user(&pool, "moderator").await;
        make_admin(&pool, &moderator).await;

        let tweet = seed_tweet(&pool, &bob, "hello").await;
        assert!(matches!(
            delete_tweet(&pool, &actor(&alice), &tweet).await,
            Err(AppError::Forbidden(_))
        ));

        delete_tweet(&pool, &admin(&moderator), &tweet).await.unwrap();
        assert!(TweetRepository::get_by_id(&pool, &tweet).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn notifications_cap_at_fifty_newest_first() {
        let pool = test_pool().await;
        let bob = seed_user(&pool, "bob").await;

        for i in 0..55 {
            let follower = seed_user(&pool, &format!("user{}", i)).await;
            follow(&pool, &follower, &bob).await.unwrap();
        }

        let notifications = notifications_for(&pool, &bob).await.unwrap();
        assert_eq!(notifications.len(), 50);
        assert_eq!(notifications[0].sender_username, "user54");

        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 55);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        let id = notifications_for(&pool, &bob).await.unwrap()[0].id.clone();

        let first = mark_notification_read(&pool, &bob, &id).await.unwrap();
        assert!(first.is_read);

        let second = mark_notification_read(&pool, &bob, &id).await.unwrap();
        assert!(second.is_read);
        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn notification_mutations_are_owner_scoped() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        let id = notifications_for(&pool, &bob).await.unwrap()[0].id.clone();

        assert!(matches!(
            mark_notification_read(&pool, &alice, &id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            delete_notification(&pool, &alice, &id).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(notifications_for(&pool, &bob).await.unwrap().len(), 1);

        assert!(matches!(
            mark_notification_read(&pool, &bob, "no-such-id").await,
            Err(AppError::NotFound(_))
        ));

        delete_notification(&pool, &bob, &id).await.unwrap();
        assert!(notifications_for(&pool, &bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_all_read_clears_unread_and_tolerates_zero() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let carol = seed_user(&pool, "carol").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        follow(&pool, &carol, &bob).await.unwrap();
        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 2);

        mark_all_notifications_read(&pool, &bob).await.unwrap();
        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 0);

        // No-op with nothing unread.
        mark_all_notifications_read(&pool, &bob).await.unwrap();
        assert_eq!(unread_count(&pool, &bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn alice_and_bob_walkthrough() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        follow(&pool, &alice, &bob).await.unwrap();
        let followers = FollowRepository::followers_of(&pool, &bob).await.unwrap();
        assert_eq!(followers[0].username, "alice");

        let tweet = seed_tweet(&pool, &bob, "hello").await;

        let likes = like(&pool, &alice, &tweet).await.unwrap();
        assert_eq!(likes, vec![alice.clone()]);

        let comments = comment(&pool, &alice, &tweet, "hi").await.unwrap();
        assert_eq!(comments[0].text, "hi");

        let likes = unlike(&pool, &alice, &tweet).await.unwrap();
        assert!(likes.is_empty());

        let kinds: Vec<_> = notifications_for(&pool, &bob)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(kinds, vec!["comment", "like", "follow"]);
    }
}
