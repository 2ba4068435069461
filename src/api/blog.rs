//! Blog endpoints
//!
//! CRUD, likes, comments and per-blog role management. All routes require
//! a valid bearer token; finer-grained authorization (owner / editor /
//! admin) is enforced by the blog service.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedCaller};
use crate::api::responses::{ApiMessage, BlogAuthorsResponse, UserSummary};
use crate::models::{Blog, BlogComment, BlogRole};
use crate::services::blog::{BlogInput, BlogRoleRequest, BlogUpdate, CommentInput};

/// Request body for creating a blog
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
}

/// Request body for updating a blog
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Request body for comment operations
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// Zero when posting, the comment id when editing or deleting
    #[serde(default)]
    pub id: i64,
    pub blog_id: i64,
    #[serde(default)]
    pub text: String,
}

impl From<CommentRequest> for CommentInput {
    fn from(body: CommentRequest) -> Self {
        Self {
            id: body.id,
            blog_id: body.blog_id,
            text: body.text,
        }
    }
}

/// Request body for the combined role operations
#[derive(Debug, Deserialize)]
pub struct RolesRequest {
    pub blog_id: i64,
    pub user_id: i64,
    pub roles: Vec<BlogRole>,
}

/// Request body for the single-role operations
#[derive(Debug, Deserialize)]
pub struct SingleRoleRequest {
    pub blog_id: i64,
    pub user_id: i64,
}

/// Build the blog router (token guarded by the route layer)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs))
        .route("/", post(create_blog))
        .route("/", put(update_blog))
        .route("/{id}", get(get_blog))
        .route("/{id}", delete(delete_blog))
        .route("/{id}/liked", get(is_liked))
        .route("/{id}/like", post(like_blog))
        .route("/{id}/like", delete(unlike_blog))
        .route("/{id}/comments", get(list_comments))
        .route("/comments", post(create_comment))
        .route("/comments", put(update_comment))
        .route("/comments", delete(delete_comment))
        .route("/{id}/authors", get(get_authors))
        .route("/roles/assign", post(assign_roles))
        .route("/roles/revoke", post(revoke_roles))
        .route("/owners/assign", post(assign_owner))
        .route("/owners/revoke", post(revoke_owner))
        .route("/editors/assign", post(assign_editor))
        .route("/editors/revoke", post(revoke_editor))
}

// ============================================================================
// CRUD
// ============================================================================

/// GET /blogs
async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, ApiError> {
    let blogs = state
        .blog_service
        .list()
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;
    Ok(Json(blogs))
}

/// GET /blogs/{id}
async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Blog>, ApiError> {
    let blog = state
        .blog_service
        .get(id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?
        .ok_or_else(|| ApiError::bad_request("Invalid blog id."))?;
    Ok(Json(blog))
}

/// POST /blogs
async fn create_blog(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<CreateBlogRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .create(
            caller.user_id(),
            BlogInput {
                title: body.title,
                content: body.content,
            },
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Blog created successfully.")))
}

/// PUT /blogs
async fn update_blog(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<UpdateBlogRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .update(
            caller.user_id(),
            BlogUpdate {
                id: body.id,
                title: body.title,
                content: body.content,
            },
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Blog updated successfully.")))
}

/// DELETE /blogs/{id}
async fn delete_blog(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .delete(caller.user_id(), id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Blog deleted successfully.")))
}

// ============================================================================
// Likes
// ============================================================================

/// GET /blogs/{id}/liked
async fn is_liked(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(id): Path<i64>,
) -> Result<Json<bool>, ApiError> {
    let liked = state
        .blog_service
        .is_liked(caller.user_id(), id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;
    Ok(Json(liked))
}

/// POST /blogs/{id}/like
async fn like_blog(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .like(caller.user_id(), id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Blog liked successfully.")))
}

/// DELETE /blogs/{id}/like
async fn unlike_blog(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .unlike(caller.user_id(), id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Blog like removed successfully.")))
}

// ============================================================================
// Comments
// ============================================================================

/// GET /blogs/{id}/comments
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<BlogComment>>, ApiError> {
    let comments = state
        .blog_service
        .comments(id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;
    Ok(Json(comments))
}

/// POST /blogs/comments
async fn create_comment(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<CommentRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .comment(caller.user_id(), body.into())
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Comment inserted successfully.")))
}

/// PUT /blogs/comments
async fn update_comment(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<CommentRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .edit_comment(caller.user_id(), body.into())
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Comment updated successfully.")))
}

/// DELETE /blogs/comments
async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<CommentRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .delete_comment(caller.user_id(), body.into())
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Comment deleted successfully.")))
}

// ============================================================================
// Role management
// ============================================================================

/// GET /blogs/{id}/authors
async fn get_authors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogAuthorsResponse>, ApiError> {
    let authors = state
        .blog_service
        .authors(id)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(BlogAuthorsResponse {
        owners: authors.owners.into_iter().map(UserSummary::from).collect(),
        editors: authors.editors.into_iter().map(UserSummary::from).collect(),
    }))
}

/// POST /blogs/roles/assign
async fn assign_roles(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<RolesRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .assign_roles(
            caller.user_id(),
            BlogRoleRequest {
                blog_id: body.blog_id,
                user_id: body.user_id,
                roles: body.roles,
            },
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Roles assigned successfully.")))
}

/// POST /blogs/roles/revoke
async fn revoke_roles(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<RolesRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .revoke_roles(
            caller.user_id(),
            BlogRoleRequest {
                blog_id: body.blog_id,
                user_id: body.user_id,
                roles: body.roles,
            },
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Roles revoked successfully.")))
}

/// POST /blogs/owners/assign
async fn assign_owner(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<SingleRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .assign_role(caller.user_id(), body.blog_id, body.user_id, BlogRole::Owner)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Owner role assigned successfully.")))
}

/// POST /blogs/owners/revoke
async fn revoke_owner(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<SingleRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .revoke_role(caller.user_id(), body.blog_id, body.user_id, BlogRole::Owner)
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Owner role revoked successfully.")))
}

/// POST /blogs/editors/assign
async fn assign_editor(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<SingleRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .assign_role(
            caller.user_id(),
            body.blog_id,
            body.user_id,
            BlogRole::Editor,
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Editor role assigned successfully.")))
}

/// POST /blogs/editors/revoke
async fn revoke_editor(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(body): Json<SingleRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    state
        .blog_service
        .revoke_role(
            caller.user_id(),
            body.blog_id,
            body.user_id,
            BlogRole::Editor,
        )
        .await
        .map_err(|e| ApiError::from_blog_service(e, state.dev_mode))?;

    Ok(Json(ApiMessage::ok("Editor role revoked successfully.")))
}
