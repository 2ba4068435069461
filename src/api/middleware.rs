//! API middleware
//!
//! Application state, the shared error response shape, bearer-token
//! validation and the admin route guard.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::models::Role;
use crate::services::token::Claims;
use crate::services::{BlogService, BlogServiceError, TokenService, UserService, UserServiceError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub blog_service: Arc<BlogService>,
    pub tokens: TokenService,
    /// Development deployments attach error detail to responses
    pub dev_mode: bool,
}

/// The caller's validated token claims, inserted by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Claims);

impl AuthenticatedCaller {
    pub fn user_id(&self) -> i64 {
        self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedCaller>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required."))
    }
}

/// Error response shared by every endpoint:
/// `{isSuccess: false, message}` plus a detail field in development.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(rename = "isSuccess")]
    pub is_success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            detail: None,
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(detail: Option<String>) -> Self {
        Self {
            is_success: false,
            message: "Something went wrong.".to_string(),
            detail,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a user service error to a response.
    pub fn from_user_service(err: UserServiceError, dev_mode: bool) -> Self {
        match err {
            UserServiceError::Validation(msg)
            | UserServiceError::Authentication(msg)
            | UserServiceError::Crud(msg) => Self::bad_request(msg),
            UserServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                Self::internal(dev_mode.then(|| format!("{:#}", e)))
            }
        }
    }

    /// Map a blog service error to a response. Authorization failures map
    /// to 403, everything else the caller did wrong to 400.
    pub fn from_blog_service(err: BlogServiceError, dev_mode: bool) -> Self {
        match err {
            BlogServiceError::Validation(_)
            | BlogServiceError::Crud(_)
            | BlogServiceError::AlreadyAssigned(_)
            | BlogServiceError::NotAssigned(_) => Self::bad_request(err.to_string()),
            BlogServiceError::Forbidden(_) => Self::forbidden(err.to_string()),
            BlogServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                Self::internal(dev_mode.then(|| format!("{:#}", e)))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authentication middleware: validates the bearer token and inserts the
/// caller's claims into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token."))?;

    let claims = state
        .tokens
        .decode(&token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token."))?;

    request.extensions_mut().insert(AuthenticatedCaller(claims));
    Ok(next.run(request).await)
}

/// Admin authorization middleware; must run after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let caller = request
        .extensions()
        .get::<AuthenticatedCaller>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required."))?;

    if caller.role() != Role::Admin {
        return Err(ApiError::forbidden("Admin privileges required."));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let request = request_with_auth("Bearer abc123");
        assert_eq!(extract_bearer_token(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let request = request_with_auth("Basic abc123");
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let request = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(ApiError::bad_request("x").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::forbidden("x").status, StatusCode::FORBIDDEN);
        assert_eq!(ApiError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::internal(None).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forbidden_maps_blog_authorization_errors() {
        let err = BlogServiceError::Forbidden("nope".to_string());
        let api = ApiError::from_blog_service(err, false);
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.message, "nope");
    }

    #[test]
    fn test_sentinels_map_to_bad_request() {
        let err = BlogServiceError::AlreadyAssigned(crate::models::BlogRole::Editor);
        let api = ApiError::from_blog_service(err, false);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "User already has an editor role.");
    }

    #[test]
    fn test_internal_detail_only_in_dev_mode() {
        let prod = ApiError::from_blog_service(
            BlogServiceError::Internal(anyhow::anyhow!("boom")),
            false,
        );
        assert!(prod.detail.is_none());

        let dev = ApiError::from_blog_service(
            BlogServiceError::Internal(anyhow::anyhow!("boom")),
            true,
        );
        assert!(dev.detail.as_deref().unwrap_or("").contains("boom"));
    }

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::bad_request("Invalid blog id.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["message"], "Invalid blog id.");
        assert!(json.get("detail").is_none());
    }
}
