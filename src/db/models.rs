use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: String,
    pub cover_image: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub is_admin: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub expires_at: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub media: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub tweet_id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: String,
    pub kind: String,
    pub tweet_id: Option<String>,
    pub comment_id: Option<String>,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: i64,
}

/// What a follow/like/comment action may fan out as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
    Mention,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Follow => "follow",
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Mention => "mention",
        }
    }
}

/// Compact user identity for embedding in lists and joined views.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserCard {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
}

/// Comment with its author resolved for display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub profile_image: String,
    pub text: String,
    pub created_at: i64,
}

/// Notification with sender identity and tweet text resolved for display.
/// The tweet join is LEFT: a deleted tweet leaves `tweet_text` empty rather
/// than hiding the notification.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_username: String,
    pub sender_profile_image: String,
    pub kind: String,
    pub tweet_id: Option<String>,
    pub tweet_text: Option<String>,
    pub comment_id: Option<String>,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: i64,
}

/// A tweet assembled for display: author card, like list (most recent
/// first) and resolved comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetView {
    pub id: String,
    pub user: UserCard,
    pub text: String,
    pub media: String,
    pub likes: Vec<String>,
    pub comments: Vec<CommentView>,
    pub created_at: i64,
}
