//! Typed repositories (persistence stores)
//!
//! One store per aggregate: Users, Roles/UserRoles, Blogs, BlogOwners,
//! BlogEditors, BlogLikes and BlogComments. Each exposes CRUD plus the
//! existence checks the services gate on.
//!
//! Every method takes a `&mut SqliteConnection` so callers decide the
//! execution context: a pooled connection for single reads, or a
//! transaction handle when several store calls must commit together.

pub mod blog;
pub mod blog_role;
pub mod comment;
pub mod like;
pub mod role;
pub mod user;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use blog_role::{
    BlogEditorRepository, BlogOwnerRepository, SqlxBlogEditorRepository, SqlxBlogOwnerRepository,
};
pub use comment::{BlogCommentRepository, SqlxBlogCommentRepository};
pub use like::{BlogLikeRepository, SqlxBlogLikeRepository};
pub use role::{SqlxUserRoleRepository, UserRoleRepository};
pub use user::{SqlxUserRepository, UserRepository};
