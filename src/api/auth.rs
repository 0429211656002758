use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::auth::{hash_password, verify_password};
use crate::db::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::graph::Actor;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: i64,
    pub user: UserSummary,
}

/// Validate and sanitize username
fn validate_username(username: &str) -> Result<String, AppError> {
    let trimmed = username.trim();

    if trimmed.len() < 3 || trimmed.len() > 32 {
        return Err(AppError::Validation(
            "Username must be 3-32 characters".to_string(),
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Username must be alphanumeric, underscore, or hyphen".to_string(),
        ));
    }

    // Convert to lowercase for consistency
    Ok(trimmed.to_lowercase())
}

fn validate_email(email: &str) -> Result<String, AppError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };

    if !valid {
        return Err(AppError::Validation(
            "Please include a valid email".to_string(),
        ));
    }

    Ok(trimmed.to_lowercase())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    let username = validate_username(&req.username)?;
    let email = validate_email(&req.email)?;
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Please enter a password with 6 or more characters".to_string(),
        ));
    }

    if UserRepository::get_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }
    if UserRepository::get_by_username(&state.db, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let profile_image = match req.profile_picture.as_deref().filter(|p| !p.is_empty()) {
        Some(payload) => state.media.upload(payload).await?,
        None => String::new(),
    };

    let password_hash = hash_password(&req.password)?;

    let user = UserRepository::create(
        &state.db,
        req.name.trim().to_string(),
        username,
        email,
        password_hash,
        profile_image,
    )
    .await?;

    let session =
        SessionRepository::create(&state.db, user.id.clone(), state.config.session_expiry_hours)
            .await?;

    Ok(Json(AuthResponse {
        success: true,
        token: session.token,
        expires_at: session.expires_at,
        user: UserSummary {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            profile_image: user.profile_image,
            is_admin: user.is_admin,
        },
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = validate_email(&req.email)?;

    let user = UserRepository::get_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let session =
        SessionRepository::create(&state.db, user.id.clone(), state.config.session_expiry_hours)
            .await?;

    Ok(Json(AuthResponse {
        success: true,
        token: session.token,
        expires_at: session.expires_at,
        user: UserSummary {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            profile_image: user.profile_image,
            is_admin: user.is_admin,
        },
    }))
}

/// POST /api/auth/logout (requires auth)
pub async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Auth("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid Authorization format".to_string()))?;

    SessionRepository::delete(&state.db, token).await?;

    Ok(Json(serde_json::json!({"success": true})))
}

/// GET /api/auth/me (requires auth via middleware)
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserSummary>, AppError> {
    let user = UserRepository::get_by_id(&state.db, &actor.id)
        .await?
        .ok_or_else(|| AppError::Internal("User not found".to_string()))?;

    Ok(Json(UserSummary {
        id: user.id,
        name: user.name,
        username: user.username,
        email: user.email,
        profile_image: user.profile_image,
        is_admin: user.is_admin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  Alice_01 ").unwrap(), "alice_01");
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Alice@Example.com ").unwrap(), "alice@example.com");
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@nodot").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@example.").is_err());
    }
}
