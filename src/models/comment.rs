//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a blog.
///
/// Carries the commenting user's id and denormalized display name. When
/// the user account is deleted the comment survives: `user_id` is zeroed
/// and `is_user_exists` flips to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogComment {
    /// Unique identifier (0 while transient)
    pub id: i64,
    pub blog_id: i64,
    pub user_id: i64,
    /// Comment text
    pub text: String,
    /// When the comment was posted
    pub created_at: DateTime<Utc>,
    /// Denormalized author display name
    pub user_name: String,
    /// False once the authoring user account has been deleted
    pub is_user_exists: bool,
}

impl BlogComment {
    /// Build a transient comment for a live user; the id is assigned by
    /// the database on insert.
    pub fn new(blog_id: i64, user_id: i64, text: String, user_name: String) -> Self {
        Self {
            id: 0,
            blog_id,
            user_id,
            text,
            created_at: Utc::now(),
            user_name,
            is_user_exists: true,
        }
    }
}
