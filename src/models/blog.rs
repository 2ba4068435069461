//! Blog model
//!
//! The Blog entity plus the per-blog relation rows: owners, editors and
//! likes. Owner and editor are independent capability flags on a
//! (user, blog) pair, not states of a single enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier
    pub id: i64,
    /// Title (required, bounded by the configured character limit)
    pub title: String,
    /// Content (required, bounded by the configured character limit)
    pub content: String,
    /// Denormalized like counter, kept equal to the number of like rows
    pub likes: i64,
}

impl Blog {
    /// Create a new Blog with the given title and content.
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: 0, // Set by the database
            title,
            content,
            likes: 0,
        }
    }
}

/// An owner row on a (user, blog) pair.
///
/// The owner's name is denormalized onto the row. When the user account is
/// deleted the row is not removed: `user_id` is zeroed and
/// `is_owner_exists` flips to false, preserving the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogOwner {
    pub user_id: i64,
    pub blog_id: i64,
    /// Denormalized owner display name
    pub owner_name: String,
    /// False once the owning user account has been deleted
    pub is_owner_exists: bool,
}

impl BlogOwner {
    /// Build an owner row for a live user.
    pub fn new(user_id: i64, blog_id: i64, owner_name: String) -> Self {
        Self {
            user_id,
            blog_id,
            owner_name,
            is_owner_exists: true,
        }
    }
}

/// An editor row on a (user, blog) pair.
///
/// An editor may update the blog but not delete it or manage roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEditor {
    pub blog_id: i64,
    pub user_id: i64,
}

/// A like row on a (user, blog) pair; presence means "liked".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogLike {
    pub blog_id: i64,
    pub user_id: i64,
}

/// Per-blog role tag used by the role-management operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlogRole {
    Owner,
    Editor,
}

impl fmt::Display for BlogRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogRole::Owner => write!(f, "owner"),
            BlogRole::Editor => write!(f, "editor"),
        }
    }
}

impl FromStr for BlogRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OWNER" => Ok(BlogRole::Owner),
            "EDITOR" => Ok(BlogRole::Editor),
            _ => Err(anyhow::anyhow!("Invalid blog role: {}", s)),
        }
    }
}
