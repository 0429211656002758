pub mod comments;
pub mod follows;
pub mod likes;
pub mod models;
pub mod notifications;
pub mod sessions;
pub mod tweets;
pub mod users;

pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use likes::LikeRepository;
pub use models::{
    Comment, CommentView, Notification, NotificationKind, NotificationView, Session, Tweet,
    TweetView, User, UserCard,
};
pub use notifications::NotificationRepository;
pub use sessions::SessionRepository;
pub use tweets::TweetRepository;
pub use users::UserRepository;
