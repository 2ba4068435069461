//! User management endpoints (admin only)
//!
//! - GET /users/{id} - look up a user
//! - POST /users - create a user with an explicit role
//! - DELETE /users/{id} - delete a user, soft-orphaning their rows

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::UserInfo;
use crate::models::Role;
use crate::services::user::RegisterInput;

/// Request body for admin user creation
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// Build the user management router (admin guarded by the route layer)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/{id}", get(get_user))
        .route("/{id}", delete(delete_user))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, ApiError> {
    let account = state
        .user_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?
        .ok_or_else(|| ApiError::bad_request("User not found."))?;

    Ok(Json(account.into()))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    if state
        .user_service
        .get_by_email(&body.email)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?
        .is_some()
    {
        return Err(ApiError::bad_request("Email already taken."));
    }

    let input = RegisterInput {
        name: body.name,
        email: body.email,
        password: body.password,
        confirm_password: body.confirm_password,
        role: Some(body.role),
    };

    let account = state
        .user_service
        .register(input)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, ApiError> {
    let account = state
        .user_service
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?;

    Ok(Json(account.into()))
}
