//! Service layer
//!
//! Business rules on top of the repositories: registration and login,
//! token issuance, blog CRUD with per-blog authorization, likes, comments
//! and role management. Operations that must not partially apply run as
//! explicit database transactions.

pub mod blog;
pub mod password;
pub mod token;
pub mod user;

pub use blog::{BlogService, BlogServiceError};
pub use token::{Claims, TokenService};
pub use user::{UserService, UserServiceError};
