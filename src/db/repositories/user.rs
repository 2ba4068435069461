//! User repository
//!
//! Database operations for user accounts.

use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row and return it with its assigned id
    async fn create(&self, conn: &mut SqliteConnection, user: &User) -> Result<User>;

    /// Get user by ID
    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<User>>;

    /// Get user by email (the login handle)
    async fn find_by_email(&self, conn: &mut SqliteConnection, email: &str)
        -> Result<Option<User>>;

    /// Delete a user row; returns whether a row was removed
    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository;

impl SqlxUserRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a boxed repository for injection into services
    pub fn boxed() -> Arc<dyn UserRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, conn: &mut SqliteConnection, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(conn)
        .await
        .context("Failed to create user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        })
    }

    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to get user by ID")?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn find_by_email(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await
        .context("Failed to get user by email")?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() == 1)
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}
