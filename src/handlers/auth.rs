//! Authentication HTTP handlers
//!
//! Endpoints for account registration and login.

use axum::{extract::State, Json};
use validator::Validate;

use super::AuthenticatedUser;
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::models::{AuthTokenResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;

fn map_auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::EmailAlreadyRegistered => ApiError::Conflict(e.to_string()),
        AuthError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
        AuthError::UserNotFound => ApiError::NotFound(e.to_string()),
        AuthError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        AuthError::HashingFailed(_) | AuthError::TokenError(_) => {
            ApiError::InternalError(e.to_string())
        }
    }
}

/// POST /api/auth/register - Create an account and issue a token
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    req.validate()?;

    let tokens = state
        .auth_service
        .register(req)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(tokens))
}

/// POST /api/auth/login - Verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    req.validate()?;

    let tokens = state
        .auth_service
        .login(req)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(tokens))
}

/// GET /api/auth/me - Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .get_user_by_id(user.user_id)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(user.into()))
}
