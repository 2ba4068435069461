//! Authentication endpoints
//!
//! - POST /auth/register - self-service signup (and role-explicit creation)
//! - POST /auth/login - credential check and token issuance

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::UserInfo;
use crate::models::Role;
use crate::services::user::RegisterInput;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Explicit role for admin-created accounts; omitted for self-service
    pub role: Option<Role>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Build the auth router (public routes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let input = RegisterInput {
        name: body.name,
        email: body.email,
        password: body.password,
        confirm_password: body.confirm_password,
        role: body.role,
    };

    let account = state
        .user_service
        .register(input)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let account = state
        .user_service
        .login(&body.email, &body.password)
        .await
        .map_err(|e| ApiError::from_user_service(e, state.dev_mode))?;

    Ok(Json(account.into()))
}
