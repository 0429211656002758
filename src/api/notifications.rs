use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::api::state::AppState;
use crate::error::AppError;
use crate::graph::{self, Actor};

/// GET /api/notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    let notifications = graph::notifications_for(&state.db, &actor.id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": notifications,
    })))
}

/// GET /api/notifications/unread-count
pub async fn get_unread_count(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = graph::unread_count(&state.db, &actor.id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": count,
    })))
}

/// PUT /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let notification = graph::mark_notification_read(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": notification,
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    graph::mark_all_notifications_read(&state.db, &actor.id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All notifications marked as read",
    })))
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    graph::delete_notification(&state.db, &actor.id, &id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Notification removed",
    })))
}
