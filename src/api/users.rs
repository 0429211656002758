use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::db::models::User;
use crate::db::users::ProfileChanges;
use crate::db::{FollowRepository, UserRepository};
use crate::error::AppError;
use crate::graph::{self, Actor};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_picture: Option<String>,
    pub cover_picture: Option<String>,
}

/// Profile with relationship numbers resolved relative to the viewer.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

/// GET /api/users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !actor.is_admin {
        return Err(AppError::Forbidden("User not authorized".to_string()));
    }

    let users = UserRepository::list(&state.db).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": users.len(),
        "data": users,
    })))
}

/// GET /api/users/search?query=
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Please provide a search query".to_string()))?;

    let users = UserRepository::search(&state.db, query).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": users.len(),
        "data": users,
    })))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = UserRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let followers_count = FollowRepository::follower_count(&state.db, &user.id).await?;
    let following_count = FollowRepository::following_count(&state.db, &user.id).await?;
    let is_following = actor.id != user.id
        && FollowRepository::exists(&state.db, &actor.id, &user.id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": UserProfile {
            user,
            followers_count,
            following_count,
            is_following,
        },
    })))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(bio) = &req.bio {
        if bio.chars().count() > 160 {
            return Err(AppError::Validation(
                "Bio cannot be more than 160 characters".to_string(),
            ));
        }
    }

    // Empty strings are treated as "leave unchanged", like the rest of the
    // optional fields.
    let mut changes = ProfileChanges {
        name: req.name.filter(|s| !s.trim().is_empty()),
        bio: req.bio.filter(|s| !s.is_empty()),
        location: req.location.filter(|s| !s.is_empty()),
        website: req.website.filter(|s| !s.is_empty()),
        profile_image: None,
        cover_image: None,
    };

    if let Some(payload) = req.profile_picture.as_deref().filter(|p| !p.is_empty()) {
        changes.profile_image = Some(state.media.upload(payload).await?);
    }
    if let Some(payload) = req.cover_picture.as_deref().filter(|p| !p.is_empty()) {
        changes.cover_image = Some(state.media.upload(payload).await?);
    }

    let user = UserRepository::update_profile(&state.db, &actor.id, changes).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": user,
    })))
}

/// PUT /api/users/:id/follow
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    graph::follow(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User followed successfully",
    })))
}

/// PUT /api/users/:id/unfollow
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    graph::unfollow(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User unfollowed successfully",
    })))
}

/// GET /api/users/:id/followers
pub async fn get_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    UserRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let followers = FollowRepository::followers_of(&state.db, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": followers.len(),
        "data": followers,
    })))
}

/// GET /api/users/:id/following
pub async fn get_following(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    UserRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let following = FollowRepository::following_of(&state.db, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": following.len(),
        "data": following,
    })))
}
