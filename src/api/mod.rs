//! API layer - HTTP handlers and routing
//!
//! Thin handlers that translate requests into service calls and map typed
//! service errors onto status codes. Three route groups:
//! - public: register and login
//! - authenticated: everything under /blogs
//! - admin: user management under /users

pub mod auth;
pub mod blog;
pub mod middleware;
pub mod responses;
pub mod users;


use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedCaller};

/// Build the API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (token + admin role)
    let admin_routes = Router::new()
        .nest("/users", users::router())
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (token required)
    let protected_routes = Router::new()
        .nest("/blogs", blog::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .nest("/auth", auth::router())
        .merge(protected_routes)
        .merge(admin_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    build_api_router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
