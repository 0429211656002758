use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::db::{FollowRepository, TweetRepository};
use crate::error::AppError;
use crate::graph::{self, Actor};

#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub text: String,
    pub media: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

fn validate_tweet_text(text: &str) -> Result<&str, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    if trimmed.chars().count() > 280 {
        return Err(AppError::Validation(
            "Tweet cannot be more than 280 characters".to_string(),
        ));
    }

    Ok(trimmed)
}

/// POST /api/tweets
pub async fn create_tweet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTweetRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let text = validate_tweet_text(&req.text)?.to_string();

    let media = match req.media.as_deref().filter(|m| !m.is_empty()) {
        Some(payload) => state.media.upload(payload).await?,
        None => String::new(),
    };

    let tweet = TweetRepository::create(&state.db, &actor.id, text, media).await?;
    let view = TweetRepository::to_view(&state.db, tweet).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": view,
    })))
}

/// GET /api/tweets
pub async fn get_all_tweets(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tweets = TweetRepository::list_recent(&state.db).await?;
    let views = TweetRepository::to_views(&state.db, tweets).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": views.len(),
        "data": views,
    })))
}

/// GET /api/tweets/timeline — own tweets plus everyone the actor follows.
pub async fn get_timeline(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut author_ids = FollowRepository::following_ids(&state.db, &actor.id).await?;
    author_ids.push(actor.id.clone());

    let tweets = TweetRepository::list_by_users(&state.db, &author_ids).await?;
    let views = TweetRepository::to_views(&state.db, tweets).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": views.len(),
        "data": views,
    })))
}

/// GET /api/tweets/user/:id
pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tweets = TweetRepository::list_by_user(&state.db, &id).await?;
    let views = TweetRepository::to_views(&state.db, tweets).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": views.len(),
        "data": views,
    })))
}

/// GET /api/tweets/:id
pub async fn get_tweet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tweet = TweetRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;
    let view = TweetRepository::to_view(&state.db, tweet).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": view,
    })))
}

/// DELETE /api/tweets/:id
pub async fn delete_tweet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    graph::delete_tweet(&state.db, &actor, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Tweet removed",
    })))
}

/// PUT /api/tweets/:id/like
pub async fn like_tweet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let likes = graph::like(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": likes,
    })))
}

/// PUT /api/tweets/:id/unlike
pub async fn unlike_tweet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let likes = graph::unlike(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": likes,
    })))
}

/// POST /api/tweets/:id/comment
pub async fn comment_on_tweet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let comments = graph::comment(&state.db, &actor.id, &id, &req.text).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": comments,
    })))
}

/// DELETE /api/tweets/:id/comment/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let comments = graph::delete_comment(&state.db, &actor, &id, &comment_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": comments,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tweet_text() {
        assert_eq!(validate_tweet_text("  hello  ").unwrap(), "hello");
        assert!(validate_tweet_text("   ").is_err());
        assert!(validate_tweet_text(&"a".repeat(281)).is_err());
        assert!(validate_tweet_text(&"é".repeat(280)).is_ok());
    }
}
