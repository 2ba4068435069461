//! User service
//!
//! Registration, login and admin user management. A user row and its role
//! link are written together; deleting a user soft-orphans the dependent
//! owner and comment rows in the same transaction instead of erasing
//! history.

use crate::db::repositories::{
    BlogCommentRepository, BlogOwnerRepository, UserRepository, UserRoleRepository,
};
use crate::models::{Role, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Invalid input (empty fields, duplicates, bad ids)
    #[error("{0}")]
    Validation(String),

    /// Login credentials rejected
    #[error("{0}")]
    Authentication(String),

    /// A step of a write unit failed; the whole unit was rolled back
    #[error("{0}")]
    Crud(String),

    /// Internal error
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Explicit role for admin-created accounts; `None` means self-service
    /// signup, which defaults to Blogger and returns a token
    pub role: Option<Role>,
}

/// A resolved user account: the user row, its single role, and a bearer
/// token when the operation issues one.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub role: Role,
    pub token: Option<String>,
}

/// User service for registration, login and admin user management
pub struct UserService {
    pool: SqlitePool,
    user_repo: Arc<dyn UserRepository>,
    user_role_repo: Arc<dyn UserRoleRepository>,
    owner_repo: Arc<dyn BlogOwnerRepository>,
    comment_repo: Arc<dyn BlogCommentRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(
        pool: SqlitePool,
        user_repo: Arc<dyn UserRepository>,
        user_role_repo: Arc<dyn UserRoleRepository>,
        owner_repo: Arc<dyn BlogOwnerRepository>,
        comment_repo: Arc<dyn BlogCommentRepository>,
        tokens: TokenService,
    ) -> Self {
        Self {
            pool,
            user_repo,
            user_role_repo,
            owner_repo,
            comment_repo,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// The user row and its role link are inserted in one transaction;
    /// either both exist afterwards or neither does. Self-service signups
    /// (no explicit role) become Bloggers and get a token back;
    /// admin-created accounts keep the requested role and get none.
    pub async fn register(&self, input: RegisterInput) -> Result<UserAccount, UserServiceError> {
        self.validate_register_input(&input)?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        if self
            .user_repo
            .find_by_email(&mut conn, &input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::Validation("Email already taken.".to_string()));
        }
        drop(conn);

        let (role, wants_token) = match input.role {
            Some(role) => (role, false),
            None => (Role::Blogger, true),
        };

        let password_hash =
            hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(input.name, input.email, password_hash);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let created = match self.user_repo.create(&mut tx, &user).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("User insert failed: {:#}", e);
                return Err(UserServiceError::Crud("User creation failed.".to_string()));
            }
        };

        let role_known = self
            .user_role_repo
            .role_exists(&mut tx, role)
            .await
            .context("Failed to look up role")?;
        if !role_known {
            return Err(UserServiceError::Crud(
                "Assigning role to user failed.".to_string(),
            ));
        }

        if let Err(e) = self.user_role_repo.assign(&mut tx, created.id, role).await {
            tracing::warn!("Role insert failed: {:#}", e);
            return Err(UserServiceError::Crud(
                "Assigning role to user failed.".to_string(),
            ));
        }

        tx.commit().await.context("Failed to commit registration")?;

        let token = if wants_token {
            Some(self.tokens.issue(&created, role).context("Failed to issue token")?)
        } else {
            None
        };

        Ok(UserAccount {
            user: created,
            role,
            token,
        })
    }

    /// Verify login credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, UserServiceError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        let user = self
            .user_repo
            .find_by_email(&mut conn, email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::Authentication(
                    "Invalid email. Try registering first.".to_string(),
                )
            })?;

        let password_valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;
        if !password_valid {
            return Err(UserServiceError::Authentication(
                "Invalid password.".to_string(),
            ));
        }

        let role = self
            .user_role_repo
            .single_role_of(&mut conn, user.id)
            .await
            .context("Failed to resolve role")?
            .ok_or_else(|| {
                UserServiceError::Authentication("Roles not found for user.".to_string())
            })?;

        let token = self.tokens.issue(&user, role).context("Failed to issue token")?;

        Ok(UserAccount {
            user,
            role,
            token: Some(token),
        })
    }

    /// Look up a user and their role by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UserAccount>, UserServiceError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        let Some(user) = self
            .user_repo
            .find_by_id(&mut conn, id)
            .await
            .context("Failed to look up user")?
        else {
            return Ok(None);
        };

        let role = self
            .user_role_repo
            .single_role_of(&mut conn, user.id)
            .await
            .context("Failed to resolve role")?
            .ok_or_else(|| anyhow::anyhow!("User {} has no resolvable role", user.id))?;

        Ok(Some(UserAccount {
            user,
            role,
            token: None,
        }))
    }

    /// Look up a user and their role by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserServiceError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        let Some(user) = self
            .user_repo
            .find_by_email(&mut conn, email)
            .await
            .context("Failed to look up user")?
        else {
            return Ok(None);
        };

        let role = self
            .user_role_repo
            .single_role_of(&mut conn, user.id)
            .await
            .context("Failed to resolve role")?
            .ok_or_else(|| anyhow::anyhow!("User {} has no resolvable role", user.id))?;

        Ok(Some(UserAccount {
            user,
            role,
            token: None,
        }))
    }

    /// Delete a user account.
    ///
    /// One transaction: remove the user row (the role link rides the FK
    /// cascade), then soft-orphan the user's owner rows and comments so
    /// historical blog content stays intact. Any failing step aborts the
    /// whole unit.
    pub async fn delete_user(&self, user_id: i64) -> Result<UserAccount, UserServiceError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        let user = self
            .user_repo
            .find_by_id(&mut conn, user_id)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| UserServiceError::Validation("User not found.".to_string()))?;

        let role = self
            .user_role_repo
            .single_role_of(&mut conn, user.id)
            .await
            .context("Failed to resolve role")?
            .ok_or_else(|| anyhow::anyhow!("User {} has no resolvable role", user.id))?;
        drop(conn);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let removed = self
            .user_repo
            .delete(&mut tx, user.id)
            .await
            .context("Failed to delete user")?;
        if !removed {
            return Err(UserServiceError::Crud("Invalid user id.".to_string()));
        }

        if let Err(e) = self.owner_repo.orphan_rows_of_user(&mut tx, user.id).await {
            tracing::warn!("Owner orphaning failed: {:#}", e);
            return Err(UserServiceError::Crud(
                "Failed to update owner table.".to_string(),
            ));
        }

        if let Err(e) = self.comment_repo.orphan_rows_of_user(&mut tx, user.id).await {
            tracing::warn!("Comment orphaning failed: {:#}", e);
            return Err(UserServiceError::Crud(
                "Failed to update comment table.".to_string(),
            ));
        }

        tx.commit().await.context("Failed to commit user deletion")?;

        Ok(UserAccount {
            user,
            role,
            token: None,
        })
    }

    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), UserServiceError> {
        if input.name.trim().is_empty() {
            return Err(UserServiceError::Validation(
                "Name cannot be empty.".to_string(),
            ));
        }
        if input.email.trim().is_empty() {
            return Err(UserServiceError::Validation(
                "Email cannot be empty.".to_string(),
            ));
        }
        if !input.email.contains('@') {
            return Err(UserServiceError::Validation(
                "Invalid email format.".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(UserServiceError::Validation(
                "Password cannot be empty.".to_string(),
            ));
        }
        if input.password != input.confirm_password {
            return Err(UserServiceError::Validation(
                "Password and confirm password do not match.".to_string(),
            ));
        }
        Ok(())
    }
}
