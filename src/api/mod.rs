pub mod auth;
pub mod middleware;
pub mod notifications;
pub mod state;
pub mod tweets;
pub mod users;

pub use middleware::RateLimiter;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    // Everything except registration, login and the health probe requires a
    // resolved actor.
    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(users::list_users))
        .route("/api/users/search", get(users::search_users))
        .route("/api/users/profile", put(users::update_profile))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/users/:id/follow", put(users::follow_user))
        .route("/api/users/:id/unfollow", put(users::unfollow_user))
        .route("/api/users/:id/followers", get(users::get_followers))
        .route("/api/users/:id/following", get(users::get_following))
        .route(
            "/api/tweets",
            post(tweets::create_tweet).get(tweets::get_all_tweets),
        )
        .route("/api/tweets/timeline", get(tweets::get_timeline))
        .route("/api/tweets/user/:id", get(tweets::get_user_tweets))
        .route(
            "/api/tweets/:id",
            get(tweets::get_tweet).delete(tweets::delete_tweet),
        )
        .route("/api/tweets/:id/like", put(tweets::like_tweet))
        .route("/api/tweets/:id/unlike", put(tweets::unlike_tweet))
        .route("/api/tweets/:id/comment", post(tweets::comment_on_tweet))
        .route(
            "/api/tweets/:id/comment/:comment_id",
            delete(tweets::delete_comment),
        )
        .route("/api/notifications", get(notifications::get_notifications))
        .route(
            "/api/notifications/unread-count",
            get(notifications::get_unread_count),
        )
        .route(
            "/api/notifications/read-all",
            put(notifications::mark_all_read),
        )
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/api/notifications/:id",
            delete(notifications::delete_notification),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        // Add rate limiting middleware
        .layer(axum_middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            middleware::rate_limit_middleware(limiter, req, next)
        }))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
