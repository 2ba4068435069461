//! Blog service
//!
//! The business-rule core: blog CRUD with per-blog authorization, like
//! toggling with the denormalized counter, comments, and owner/editor role
//! management.
//!
//! Authorization model: the application role (admin) is resolved from the
//! role store, while owner and editor are independent capability flags on
//! a (user, blog) pair. Granting a role the user already holds or revoking
//! one they don't hold is a soft sentinel failure, distinguishable from
//! hard errors so the combined assign/revoke operations can skip it.

use crate::config::BlogConfig;
use crate::db::repositories::{
    BlogCommentRepository, BlogEditorRepository, BlogLikeRepository, BlogOwnerRepository,
    BlogRepository, UserRepository, UserRoleRepository,
};
use crate::models::{Blog, BlogComment, BlogOwner, BlogRole, Role, User};
use anyhow::Context;
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;

/// Error types for blog service operations
#[derive(Debug, thiserror::Error)]
pub enum BlogServiceError {
    /// Invalid input or unknown id (treated as a caller error)
    #[error("{0}")]
    Validation(String),

    /// Caller lacks the required role for the action
    #[error("{0}")]
    Forbidden(String),

    /// Sentinel: the user already holds the role being granted
    #[error("User already has an {0} role.")]
    AlreadyAssigned(BlogRole),

    /// Sentinel: the user does not hold the role being revoked
    #[error("User does not have an {0} role.")]
    NotAssigned(BlogRole),

    /// A step of a write unit failed; the whole unit was rolled back
    #[error("{0}")]
    Crud(String),

    /// Internal error
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Input for creating a blog
#[derive(Debug, Clone)]
pub struct BlogInput {
    pub title: String,
    pub content: String,
}

/// Input for updating a blog
#[derive(Debug, Clone)]
pub struct BlogUpdate {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Input for comment operations.
///
/// `id` must be zero when posting (transient) and nonzero when editing or
/// deleting (detached).
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub id: i64,
    pub blog_id: i64,
    pub text: String,
}

/// Input for the combined role assign/revoke operations
#[derive(Debug, Clone)]
pub struct BlogRoleRequest {
    pub blog_id: i64,
    pub user_id: i64,
    pub roles: Vec<BlogRole>,
}

/// The current owners and editors of a blog
#[derive(Debug, Clone)]
pub struct BlogAuthors {
    pub owners: Vec<User>,
    pub editors: Vec<User>,
}

/// Blog service
pub struct BlogService {
    pool: SqlitePool,
    blog_repo: Arc<dyn BlogRepository>,
    owner_repo: Arc<dyn BlogOwnerRepository>,
    editor_repo: Arc<dyn BlogEditorRepository>,
    like_repo: Arc<dyn BlogLikeRepository>,
    comment_repo: Arc<dyn BlogCommentRepository>,
    user_repo: Arc<dyn UserRepository>,
    user_role_repo: Arc<dyn UserRoleRepository>,
    limits: BlogConfig,
}

impl BlogService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: SqlitePool,
        blog_repo: Arc<dyn BlogRepository>,
        owner_repo: Arc<dyn BlogOwnerRepository>,
        editor_repo: Arc<dyn BlogEditorRepository>,
        like_repo: Arc<dyn BlogLikeRepository>,
        comment_repo: Arc<dyn BlogCommentRepository>,
        user_repo: Arc<dyn UserRepository>,
        user_role_repo: Arc<dyn UserRoleRepository>,
        limits: BlogConfig,
    ) -> Self {
        Self {
            pool,
            blog_repo,
            owner_repo,
            editor_repo,
            like_repo,
            comment_repo,
            user_repo,
            user_role_repo,
            limits,
        }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Validate a blog's title and content against the configured limits.
    pub fn verify(&self, title: &str, content: &str) -> Result<(), BlogServiceError> {
        if title.is_empty() || content.is_empty() {
            return Err(BlogServiceError::Validation(
                "Title or content not allowed to be empty.".to_string(),
            ));
        }
        if title.chars().count() > self.limits.title_char_limit {
            return Err(BlogServiceError::Validation(format!(
                "Title char limit is {}.",
                self.limits.title_char_limit
            )));
        }
        if content.chars().count() > self.limits.content_char_limit {
            return Err(BlogServiceError::Validation(format!(
                "Content char limit is {}.",
                self.limits.content_char_limit
            )));
        }
        Ok(())
    }

    /// Create a blog and make the caller its first owner.
    ///
    /// Both inserts run in one transaction; a blog row is never left
    /// behind without an owner.
    pub async fn create(&self, caller: i64, input: BlogInput) -> Result<Blog, BlogServiceError> {
        self.verify(&input.title, &input.content)?;

        let mut conn = self.acquire().await?;
        let user = self.fetch_caller(&mut conn, caller).await?;
        drop(conn);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let blog = match self
            .blog_repo
            .create(&mut tx, &Blog::new(input.title, input.content))
            .await
        {
            Ok(blog) => blog,
            Err(e) => {
                tracing::warn!("Blog insert failed: {:#}", e);
                return Err(BlogServiceError::Crud("Blog creation failed.".to_string()));
            }
        };

        let owner = BlogOwner::new(user.id, blog.id, user.name.clone());
        let assigned = self
            .owner_repo
            .assign(&mut tx, &owner)
            .await
            .unwrap_or(false);
        if !assigned {
            return Err(BlogServiceError::Crud(
                "Assigning you as an owner to the blog failed.".to_string(),
            ));
        }

        tx.commit().await.context("Failed to commit blog creation")?;

        Ok(blog)
    }

    /// Get a blog by id.
    pub async fn get(&self, blog_id: i64) -> Result<Option<Blog>, BlogServiceError> {
        let mut conn = self.acquire().await?;
        let blog = self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?;
        Ok(blog)
    }

    /// List all blogs.
    pub async fn list(&self) -> Result<Vec<Blog>, BlogServiceError> {
        let mut conn = self.acquire().await?;
        let blogs = self
            .blog_repo
            .list_all(&mut conn)
            .await
            .context("Failed to list blogs")?;
        Ok(blogs)
    }

    /// Update a blog's title and content.
    ///
    /// Allowed for admins, owners and editors.
    pub async fn update(&self, caller: i64, input: BlogUpdate) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;

        let blog = self
            .blog_repo
            .find_by_id(&mut conn, input.id)
            .await
            .context("Failed to get blog")?
            .ok_or_else(|| BlogServiceError::Validation("Invalid blog id.".to_string()))?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        let is_owner = self
            .owner_repo
            .is_owner(&mut conn, user.id, blog.id)
            .await
            .context("Failed to check owner")?;
        let is_editor = self
            .editor_repo
            .is_editor(&mut conn, blog.id, user.id)
            .await
            .context("Failed to check editor")?;
        let is_admin = self.is_admin(&mut conn, user.id).await?;

        if !(is_admin || is_owner || is_editor) {
            return Err(BlogServiceError::Forbidden(
                "You are not allowed to edit this blog.".to_string(),
            ));
        }

        let updated = Blog {
            id: blog.id,
            title: input.title,
            content: input.content,
            likes: blog.likes,
        };
        let changed = self
            .blog_repo
            .update(&mut conn, &updated)
            .await
            .unwrap_or(false);
        if !changed {
            return Err(BlogServiceError::Crud("Blog update failed.".to_string()));
        }

        Ok(())
    }

    /// Delete a blog.
    ///
    /// Allowed for admins and owners; editors cannot delete.
    pub async fn delete(&self, caller: i64, blog_id: i64) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;

        let blog = self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?
            .ok_or_else(|| {
                BlogServiceError::Validation(
                    "Invalid blog id or blog already deleted.".to_string(),
                )
            })?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        let is_owner = self
            .owner_repo
            .is_owner(&mut conn, user.id, blog.id)
            .await
            .context("Failed to check owner")?;
        let is_admin = self.is_admin(&mut conn, user.id).await?;

        if !(is_admin || is_owner) {
            return Err(BlogServiceError::Forbidden(
                "You are not allowed to delete this blog.".to_string(),
            ));
        }

        let removed = self
            .blog_repo
            .delete(&mut conn, blog.id)
            .await
            .unwrap_or(false);
        if !removed {
            return Err(BlogServiceError::Crud("Blog deletion failed.".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Likes
    // ========================================================================

    /// Whether the caller has liked the blog. Unknown blog ids read as
    /// not-liked.
    pub async fn is_liked(&self, caller: i64, blog_id: i64) -> Result<bool, BlogServiceError> {
        let mut conn = self.acquire().await?;

        if self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?
            .is_none()
        {
            return Ok(false);
        }

        let user = self.fetch_caller(&mut conn, caller).await?;

        let liked = self
            .like_repo
            .is_liked(&mut conn, blog_id, user.id)
            .await
            .context("Failed to check like")?;
        Ok(liked)
    }

    /// Like a blog.
    ///
    /// Liking an already-liked blog is a soft failure that leaves state
    /// untouched. A successful like inserts the row and bumps the counter
    /// in one transaction.
    pub async fn like(&self, caller: i64, blog_id: i64) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;

        let blog = self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?
            .ok_or_else(|| BlogServiceError::Validation("Blog not found.".to_string()))?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        let already = self
            .like_repo
            .is_liked(&mut conn, blog.id, user.id)
            .await
            .context("Failed to check like")?;
        if already {
            return Err(BlogServiceError::Validation("Already liked.".to_string()));
        }
        drop(conn);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let inserted = self
            .like_repo
            .like(&mut tx, blog.id, user.id)
            .await
            .unwrap_or(false);
        if !inserted {
            return Err(BlogServiceError::Crud("Blog like failed.".to_string()));
        }

        let bumped = self
            .blog_repo
            .increment_likes(&mut tx, blog.id)
            .await
            .unwrap_or(false);
        if !bumped {
            return Err(BlogServiceError::Crud("Blog like failed.".to_string()));
        }

        tx.commit().await.context("Failed to commit like")?;

        Ok(())
    }

    /// Remove the caller's like from a blog.
    ///
    /// Unliking a blog that was never liked is a soft failure that leaves
    /// state untouched.
    pub async fn unlike(&self, caller: i64, blog_id: i64) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;

        let blog = self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?
            .ok_or_else(|| BlogServiceError::Validation("Blog not found.".to_string()))?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        let liked = self
            .like_repo
            .is_liked(&mut conn, blog.id, user.id)
            .await
            .context("Failed to check like")?;
        if !liked {
            return Err(BlogServiceError::Validation("Like not found.".to_string()));
        }
        drop(conn);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let removed = self
            .like_repo
            .unlike(&mut tx, blog.id, user.id)
            .await
            .unwrap_or(false);
        if !removed {
            return Err(BlogServiceError::Crud(
                "Remove like from blog failed.".to_string(),
            ));
        }

        let dropped = self
            .blog_repo
            .decrement_likes(&mut tx, blog.id)
            .await
            .unwrap_or(false);
        if !dropped {
            return Err(BlogServiceError::Crud(
                "Remove like from blog failed.".to_string(),
            ));
        }

        tx.commit().await.context("Failed to commit unlike")?;

        Ok(())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Post a comment on a blog.
    ///
    /// The input must be transient (id zero); the text is attached to the
    /// caller's identity and denormalized name.
    pub async fn comment(
        &self,
        caller: i64,
        input: CommentInput,
    ) -> Result<BlogComment, BlogServiceError> {
        if input.id != 0 {
            return Err(BlogServiceError::Validation(
                "Comment object should be transient [id should be zero].".to_string(),
            ));
        }

        let mut conn = self.acquire().await?;

        if self
            .blog_repo
            .find_by_id(&mut conn, input.blog_id)
            .await
            .context("Failed to get blog")?
            .is_none()
        {
            return Err(BlogServiceError::Validation(
                "Specified blog does not exist.".to_string(),
            ));
        }

        let user = self.fetch_caller(&mut conn, caller).await?;

        let comment = BlogComment::new(input.blog_id, user.id, input.text, user.name.clone());
        let created = match self.comment_repo.create(&mut conn, &comment).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!("Comment insert failed: {:#}", e);
                return Err(BlogServiceError::Crud(
                    "Comment insertion failed.".to_string(),
                ));
            }
        };

        Ok(created)
    }

    /// Edit a comment's text.
    ///
    /// Only the comment's author may edit it, and the blog referenced by
    /// the input must match the blog stored for that comment id.
    pub async fn edit_comment(
        &self,
        caller: i64,
        input: CommentInput,
    ) -> Result<(), BlogServiceError> {
        if input.id == 0 {
            return Err(BlogServiceError::Validation(
                "Comment object should be detached.".to_string(),
            ));
        }

        let mut conn = self.acquire().await?;

        let stored = self
            .comment_repo
            .find_by_id(&mut conn, input.id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| BlogServiceError::Validation("Invalid comment id.".to_string()))?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        if user.id != stored.user_id {
            return Err(BlogServiceError::Forbidden(
                "Not authorized to edit the comment.".to_string(),
            ));
        }

        if stored.blog_id != input.blog_id {
            return Err(BlogServiceError::Validation(
                "Invalid combination of blog and comment.".to_string(),
            ));
        }

        let changed = self
            .comment_repo
            .update_text(&mut conn, stored.id, &input.text)
            .await
            .unwrap_or(false);
        if !changed {
            return Err(BlogServiceError::Crud("Comment update failed.".to_string()));
        }

        Ok(())
    }

    /// Delete a comment.
    ///
    /// Permitted for admins, any current owner of the blog, and the
    /// comment's author.
    pub async fn delete_comment(
        &self,
        caller: i64,
        input: CommentInput,
    ) -> Result<(), BlogServiceError> {
        if input.id == 0 {
            return Err(BlogServiceError::Validation(
                "Comment object should be detached.".to_string(),
            ));
        }

        let mut conn = self.acquire().await?;

        let stored = self
            .comment_repo
            .find_by_id(&mut conn, input.id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| BlogServiceError::Validation("Invalid comment id.".to_string()))?;

        let blog = self
            .blog_repo
            .find_by_id(&mut conn, stored.blog_id)
            .await
            .context("Failed to get blog")?
            .ok_or_else(|| BlogServiceError::Validation("Invalid blog id.".to_string()))?;

        let user = self.fetch_caller(&mut conn, caller).await?;

        let is_admin = self.is_admin(&mut conn, user.id).await?;
        let is_owner = self
            .owner_repo
            .is_owner(&mut conn, user.id, blog.id)
            .await
            .context("Failed to check owner")?;

        if !(is_admin || is_owner || user.id == stored.user_id) {
            return Err(BlogServiceError::Forbidden(
                "Not authorized to delete the comment.".to_string(),
            ));
        }

        if stored.blog_id != input.blog_id {
            return Err(BlogServiceError::Validation(
                "Invalid combination of blog and comment.".to_string(),
            ));
        }

        let removed = self
            .comment_repo
            .delete(&mut conn, stored.id)
            .await
            .unwrap_or(false);
        if !removed {
            return Err(BlogServiceError::Crud(
                "Comment deletion failed.".to_string(),
            ));
        }

        Ok(())
    }

    /// All comments on a blog, oldest first.
    pub async fn comments(&self, blog_id: i64) -> Result<Vec<BlogComment>, BlogServiceError> {
        let mut conn = self.acquire().await?;
        let comments = self
            .comment_repo
            .list_for_blog(&mut conn, blog_id)
            .await
            .context("Failed to list comments")?;
        Ok(comments)
    }

    // ========================================================================
    // Role management
    // ========================================================================

    /// The blog's current owners and editors. Orphaned owner rows are
    /// excluded.
    pub async fn authors(&self, blog_id: i64) -> Result<BlogAuthors, BlogServiceError> {
        let mut conn = self.acquire().await?;

        if self
            .blog_repo
            .find_by_id(&mut conn, blog_id)
            .await
            .context("Failed to get blog")?
            .is_none()
        {
            return Err(BlogServiceError::Validation("Invalid blog id.".to_string()));
        }

        let mut owners = Vec::new();
        for id in self
            .owner_repo
            .owner_ids(&mut conn, blog_id)
            .await
            .context("Failed to list owners")?
        {
            if let Some(user) = self
                .user_repo
                .find_by_id(&mut conn, id)
                .await
                .context("Failed to look up owner")?
            {
                owners.push(user);
            }
        }

        let mut editors = Vec::new();
        for id in self
            .editor_repo
            .editor_ids(&mut conn, blog_id)
            .await
            .context("Failed to list editors")?
        {
            if let Some(user) = self
                .user_repo
                .find_by_id(&mut conn, id)
                .await
                .context("Failed to look up editor")?
            {
                editors.push(user);
            }
        }

        Ok(BlogAuthors { owners, editors })
    }

    /// Grant a single role on a blog. Caller must be a current owner or
    /// an admin; granting a role the user already holds returns the
    /// `AlreadyAssigned` sentinel.
    pub async fn assign_role(
        &self,
        caller: i64,
        blog_id: i64,
        user_id: i64,
        role: BlogRole,
    ) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;
        let target = self.check_role_management(&mut conn, caller, blog_id, user_id).await?;
        self.grant(&mut conn, blog_id, &target, role).await
    }

    /// Revoke a single role on a blog. Caller must be a current owner or
    /// an admin; revoking a role the user does not hold returns the
    /// `NotAssigned` sentinel.
    pub async fn revoke_role(
        &self,
        caller: i64,
        blog_id: i64,
        user_id: i64,
        role: BlogRole,
    ) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;
        let target = self.check_role_management(&mut conn, caller, blog_id, user_id).await?;
        self.retract(&mut conn, blog_id, &target, role).await
    }

    /// Grant several roles in one request.
    ///
    /// Each named role is processed independently: an `AlreadyAssigned`
    /// sentinel is skipped, any other failure aborts and is returned.
    pub async fn assign_roles(
        &self,
        caller: i64,
        request: BlogRoleRequest,
    ) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;
        let target = self
            .check_role_management(&mut conn, caller, request.blog_id, request.user_id)
            .await?;

        // Editor first, then owner, mirroring the single-role operations
        for role in [BlogRole::Editor, BlogRole::Owner] {
            if !request.roles.contains(&role) {
                continue;
            }
            match self.grant(&mut conn, request.blog_id, &target, role).await {
                Ok(()) | Err(BlogServiceError::AlreadyAssigned(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Revoke several roles in one request.
    ///
    /// A `NotAssigned` sentinel is skipped, any other failure aborts and
    /// is returned.
    pub async fn revoke_roles(
        &self,
        caller: i64,
        request: BlogRoleRequest,
    ) -> Result<(), BlogServiceError> {
        let mut conn = self.acquire().await?;
        let target = self
            .check_role_management(&mut conn, caller, request.blog_id, request.user_id)
            .await?;

        for role in [BlogRole::Editor, BlogRole::Owner] {
            if !request.roles.contains(&role) {
                continue;
            }
            match self.retract(&mut conn, request.blog_id, &target, role).await {
                Ok(()) | Err(BlogServiceError::NotAssigned(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Sqlite>, BlogServiceError> {
        let conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Ok(conn)
    }

    /// Resolve the caller against the user store. The id comes from
    /// validated token claims, so a missing row is an invariant violation
    /// between the auth layer and the store, not a caller error.
    async fn fetch_caller(
        &self,
        conn: &mut SqliteConnection,
        caller: i64,
    ) -> Result<User, BlogServiceError> {
        self.user_repo
            .find_by_id(conn, caller)
            .await
            .context("Failed to look up caller")?
            .ok_or_else(|| {
                BlogServiceError::Internal(anyhow::anyhow!("Logged in user details not found."))
            })
    }

    /// Whether the user's single application role is Admin.
    async fn is_admin(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<bool, BlogServiceError> {
        let role = self
            .user_role_repo
            .single_role_of(conn, user_id)
            .await
            .context("Failed to resolve role")?;
        Ok(role == Some(Role::Admin))
    }

    /// Shared pre-checks for the role-management operations: the blog must
    /// exist, the caller must be one of its owners or an admin, and the
    /// target user must exist.
    async fn check_role_management(
        &self,
        conn: &mut SqliteConnection,
        caller: i64,
        blog_id: i64,
        user_id: i64,
    ) -> Result<User, BlogServiceError> {
        if self
            .blog_repo
            .find_by_id(&mut *conn, blog_id)
            .await
            .context("Failed to get blog")?
            .is_none()
        {
            return Err(BlogServiceError::Validation("Invalid blog id.".to_string()));
        }

        let acting = self.fetch_caller(&mut *conn, caller).await?;

        let is_owner = self
            .owner_repo
            .is_owner(&mut *conn, acting.id, blog_id)
            .await
            .context("Failed to check owner")?;
        let is_admin = self.is_admin(&mut *conn, acting.id).await?;

        if !(is_owner || is_admin) {
            return Err(BlogServiceError::Forbidden(
                "Not authorized to manage roles.".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(&mut *conn, user_id)
            .await
            .context("Failed to look up target user")?
            .ok_or_else(|| BlogServiceError::Validation("User not found.".to_string()))
    }

    async fn grant(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        target: &User,
        role: BlogRole,
    ) -> Result<(), BlogServiceError> {
        match role {
            BlogRole::Editor => {
                let already = self
                    .editor_repo
                    .is_editor(&mut *conn, blog_id, target.id)
                    .await
                    .context("Failed to check editor")?;
                if already {
                    return Err(BlogServiceError::AlreadyAssigned(BlogRole::Editor));
                }

                let assigned = self
                    .editor_repo
                    .assign(&mut *conn, blog_id, target.id)
                    .await
                    .unwrap_or(false);
                if !assigned {
                    return Err(BlogServiceError::Crud(
                        "An error occurred while assigning editor role.".to_string(),
                    ));
                }
            }
            BlogRole::Owner => {
                let already = self
                    .owner_repo
                    .is_owner(&mut *conn, target.id, blog_id)
                    .await
                    .context("Failed to check owner")?;
                if already {
                    return Err(BlogServiceError::AlreadyAssigned(BlogRole::Owner));
                }

                let owner = BlogOwner::new(target.id, blog_id, target.name.clone());
                let assigned = self
                    .owner_repo
                    .assign(&mut *conn, &owner)
                    .await
                    .unwrap_or(false);
                if !assigned {
                    return Err(BlogServiceError::Crud(
                        "Assigning user as owner failed.".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    async fn retract(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        target: &User,
        role: BlogRole,
    ) -> Result<(), BlogServiceError> {
        match role {
            BlogRole::Editor => {
                let holds = self
                    .editor_repo
                    .is_editor(&mut *conn, blog_id, target.id)
                    .await
                    .context("Failed to check editor")?;
                if !holds {
                    return Err(BlogServiceError::NotAssigned(BlogRole::Editor));
                }

                let revoked = self
                    .editor_repo
                    .revoke(&mut *conn, blog_id, target.id)
                    .await
                    .unwrap_or(false);
                if !revoked {
                    return Err(BlogServiceError::Crud(
                        "An error occurred while revoking editor role.".to_string(),
                    ));
                }
            }
            BlogRole::Owner => {
                let holds = self
                    .owner_repo
                    .is_owner(&mut *conn, target.id, blog_id)
                    .await
                    .context("Failed to check owner")?;
                if !holds {
                    return Err(BlogServiceError::NotAssigned(BlogRole::Owner));
                }

                let revoked = self
                    .owner_repo
                    .revoke(&mut *conn, target.id, blog_id)
                    .await
                    .unwrap_or(false);
                if !revoked {
                    return Err(BlogServiceError::Crud(
                        "Removing user from owner role failed.".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
