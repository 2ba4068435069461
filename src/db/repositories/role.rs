//! User role repository
//!
//! The application-wide role assignment: `roles` holds the seeded closed
//! set (ADMIN, BLOGGER), `user_roles` links each user to exactly one of
//! them. The link row is written in the same transaction that creates the
//! user, and the FK cascade removes it when the user row is deleted.

use crate::models::Role;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::str::FromStr;
use std::sync::Arc;

/// User role repository trait
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Check that the role's seeded row exists
    async fn role_exists(&self, conn: &mut SqliteConnection, role: Role) -> Result<bool>;

    /// Link a user to a role
    async fn assign(&self, conn: &mut SqliteConnection, user_id: i64, role: Role) -> Result<()>;

    /// Resolve the user's single role.
    ///
    /// Returns `None` when the user has no role row or, degenerately, more
    /// than one; both mean the role cannot be resolved.
    async fn single_role_of(&self, conn: &mut SqliteConnection, user_id: i64)
        -> Result<Option<Role>>;
}

/// SQLx-based user role repository implementation
pub struct SqlxUserRoleRepository;

impl SqlxUserRoleRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a boxed repository for injection into services
    pub fn boxed() -> Arc<dyn UserRoleRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxUserRoleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRoleRepository for SqlxUserRoleRepository {
    async fn role_exists(&self, conn: &mut SqliteConnection, role: Role) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM roles WHERE id = ?")
            .bind(role.id())
            .fetch_optional(conn)
            .await
            .context("Failed to look up role")?;

        Ok(row.is_some())
    }

    async fn assign(&self, conn: &mut SqliteConnection, user_id: i64, role: Role) -> Result<()> {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role.id())
            .execute(conn)
            .await
            .context("Failed to assign role")?;

        Ok(())
    }

    async fn single_role_of(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Option<Role>> {
        let rows = sqlx::query(
            r#"
            SELECT roles.name
            FROM user_roles
            JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
        .context("Failed to resolve user role")?;

        if rows.len() != 1 {
            return Ok(None);
        }

        let name: String = rows[0].get("name");
        let role = Role::from_str(&name)
            .with_context(|| format!("Invalid role in database: {}", name))?;

        Ok(Some(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        SqlxUserRepository::new()
            .create(
                &mut conn,
                &User::new("Test".to_string(), email.to_string(), "hash".to_string()),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_seeded_roles_exist() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxUserRoleRepository::new();

        assert!(repo.role_exists(&mut conn, Role::Admin).await.unwrap());
        assert!(repo.role_exists(&mut conn, Role::Blogger).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_and_resolve_single_role() {
        let pool = setup().await;
        let user_id = insert_user(&pool, "ann@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxUserRoleRepository::new();

        repo.assign(&mut conn, user_id, Role::Blogger).await.unwrap();

        let role = repo.single_role_of(&mut conn, user_id).await.unwrap();
        assert_eq!(role, Some(Role::Blogger));
    }

    #[tokio::test]
    async fn test_unassigned_user_has_no_resolvable_role() {
        let pool = setup().await;
        let user_id = insert_user(&pool, "ann@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxUserRoleRepository::new();

        let role = repo.single_role_of(&mut conn, user_id).await.unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn test_multiple_roles_are_unresolvable() {
        let pool = setup().await;
        let user_id = insert_user(&pool, "ann@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxUserRoleRepository::new();

        repo.assign(&mut conn, user_id, Role::Blogger).await.unwrap();
        repo.assign(&mut conn, user_id, Role::Admin).await.unwrap();

        let role = repo.single_role_of(&mut conn, user_id).await.unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn test_role_rows_cascade_on_user_delete() {
        let pool = setup().await;
        let user_id = insert_user(&pool, "ann@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxUserRoleRepository::new();

        repo.assign(&mut conn, user_id, Role::Blogger).await.unwrap();
        SqlxUserRepository::new()
            .delete(&mut conn, user_id)
            .await
            .unwrap();

        let role = repo.single_role_of(&mut conn, user_id).await.unwrap();
        assert_eq!(role, None);
    }
}
