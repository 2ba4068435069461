//! User model
//!
//! The User entity and the application-wide role enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user.
///
/// The email doubles as the login handle and is unique. Every user holds
/// exactly one application role, stored relationally (`roles` /
/// `user_roles`) and assigned in the same transaction that creates the
/// user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique, used to log in)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Create a new User with the given fields.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0, // Set by the database
            name,
            email,
            password_hash,
        }
    }
}

/// Application-wide role.
///
/// - Admin: full access, including user management and every blog
/// - Blogger: regular user; per-blog rights come from owner/editor flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Administrator
    Admin,
    /// Regular blogger (default for self-service signup)
    Blogger,
}

impl Role {
    /// The stable numeric id of the seeded role row
    pub fn id(&self) -> i64 {
        match self {
            Role::Admin => 1,
            Role::Blogger => 2,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Blogger
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Blogger => write!(f, "BLOGGER"),
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "BLOGGER" => Ok(Role::Blogger),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "Test User".to_string(),
            "test@example.com".to_string(),
            "hashed_password".to_string(),
        );

        assert_eq!(user.id, 0);
        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::Blogger.to_string(), "BLOGGER");
    }

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("Blogger").unwrap(), Role::Blogger);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::Blogger);
    }

    #[test]
    fn test_role_ids_match_seeded_rows() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::Blogger.id(), 2);
    }
}
