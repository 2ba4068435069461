//! Blog owner and editor repositories
//!
//! Per-blog capability rows. Owner rows carry a denormalized owner name
//! and an `is_owner_exists` flag: deleting a user account zeroes the
//! `user_id` and clears the flag instead of removing the row, so the
//! blog's history stays coherent. Editor rows are plain (blog, user)
//! pairs.

use crate::models::BlogOwner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// Blog owner repository trait
#[async_trait]
pub trait BlogOwnerRepository: Send + Sync {
    /// Insert an owner row
    async fn assign(&self, conn: &mut SqliteConnection, owner: &BlogOwner) -> Result<bool>;

    /// Remove the owner row for a (user, blog) pair
    async fn revoke(&self, conn: &mut SqliteConnection, user_id: i64, blog_id: i64)
        -> Result<bool>;

    /// Whether the user currently owns the blog
    async fn is_owner(&self, conn: &mut SqliteConnection, user_id: i64, blog_id: i64)
        -> Result<bool>;

    /// Ids of the blog's current owners; orphaned rows (zeroed user id)
    /// are excluded
    async fn owner_ids(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<Vec<i64>>;

    /// Soft-orphan every owner row of a deleted user: clear the flag and
    /// zero the user id. Returns the number of rows touched.
    async fn orphan_rows_of_user(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<u64>;
}

/// Blog editor repository trait
#[async_trait]
pub trait BlogEditorRepository: Send + Sync {
    /// Insert an editor row
    async fn assign(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64)
        -> Result<bool>;

    /// Remove the editor row for a (blog, user) pair
    async fn revoke(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64)
        -> Result<bool>;

    /// Whether the user is currently an editor of the blog
    async fn is_editor(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64)
        -> Result<bool>;

    /// Ids of the blog's current editors
    async fn editor_ids(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<Vec<i64>>;
}

/// SQLx-based blog owner repository implementation
pub struct SqlxBlogOwnerRepository;

impl SqlxBlogOwnerRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Arc<dyn BlogOwnerRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxBlogOwnerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogOwnerRepository for SqlxBlogOwnerRepository {
    async fn assign(&self, conn: &mut SqliteConnection, owner: &BlogOwner) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_owners (user_id, blog_id, owner_name, is_owner_exists)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(owner.user_id)
        .bind(owner.blog_id)
        .bind(&owner.owner_name)
        .bind(owner.is_owner_exists)
        .execute(conn)
        .await
        .context("Failed to assign owner")?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        blog_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_owners WHERE user_id = ? AND blog_id = ?")
            .bind(user_id)
            .bind(blog_id)
            .execute(conn)
            .await
            .context("Failed to revoke owner")?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_owner(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        blog_id: i64,
    ) -> Result<bool> {
        let row = sqlx::query("SELECT user_id FROM blog_owners WHERE user_id = ? AND blog_id = ?")
            .bind(user_id)
            .bind(blog_id)
            .fetch_optional(conn)
            .await
            .context("Failed to check owner")?;

        Ok(row.is_some())
    }

    async fn owner_ids(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT user_id FROM blog_owners WHERE blog_id = ? AND user_id != 0 ORDER BY user_id",
        )
        .bind(blog_id)
        .fetch_all(conn)
        .await
        .context("Failed to list owners")?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }

    async fn orphan_rows_of_user(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE blog_owners SET is_owner_exists = 0, user_id = 0 WHERE user_id = ?",
        )
        .bind(user_id)
        .execute(conn)
        .await
        .context("Failed to orphan owner rows")?;

        Ok(result.rows_affected())
    }
}

/// SQLx-based blog editor repository implementation
pub struct SqlxBlogEditorRepository;

impl SqlxBlogEditorRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Arc<dyn BlogEditorRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxBlogEditorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogEditorRepository for SqlxBlogEditorRepository {
    async fn assign(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query("INSERT INTO blog_editors (blog_id, user_id) VALUES (?, ?)")
            .bind(blog_id)
            .bind(user_id)
            .execute(conn)
            .await
            .context("Failed to assign editor")?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_editors WHERE blog_id = ? AND user_id = ?")
            .bind(blog_id)
            .bind(user_id)
            .execute(conn)
            .await
            .context("Failed to revoke editor")?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_editor(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let row = sqlx::query("SELECT user_id FROM blog_editors WHERE blog_id = ? AND user_id = ?")
            .bind(blog_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .context("Failed to check editor")?;

        Ok(row.is_some())
    }

    async fn editor_ids(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<Vec<i64>> {
        let rows =
            sqlx::query("SELECT user_id FROM blog_editors WHERE blog_id = ? ORDER BY user_id")
                .bind(blog_id)
                .fetch_all(conn)
                .await
                .context("Failed to list editors")?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{BlogRepository, SqlxBlogRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Blog;
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let mut conn = pool.acquire().await.unwrap();
        let blog = SqlxBlogRepository::new()
            .create(&mut conn, &Blog::new("T".to_string(), "c".to_string()))
            .await
            .unwrap();
        drop(conn);

        (pool, blog.id)
    }

    #[tokio::test]
    async fn test_assign_and_check_owner() {
        let (pool, blog_id) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxBlogOwnerRepository::new();

        assert!(!repo.is_owner(&mut conn, 7, blog_id).await.unwrap());

        repo.assign(&mut conn, &BlogOwner::new(7, blog_id, "Ann".to_string()))
            .await
            .unwrap();

        assert!(repo.is_owner(&mut conn, 7, blog_id).await.unwrap());
        assert_eq!(repo.owner_ids(&mut conn, blog_id).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_revoke_owner() {
        let (pool, blog_id) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxBlogOwnerRepository::new();

        repo.assign(&mut conn, &BlogOwner::new(7, blog_id, "Ann".to_string()))
            .await
            .unwrap();

        assert!(repo.revoke(&mut conn, 7, blog_id).await.unwrap());
        assert!(!repo.is_owner(&mut conn, 7, blog_id).await.unwrap());
        assert!(!repo.revoke(&mut conn, 7, blog_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_orphan_owner_rows_keep_history() {
        let (pool, blog_id) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxBlogOwnerRepository::new();

        repo.assign(&mut conn, &BlogOwner::new(7, blog_id, "Ann".to_string()))
            .await
            .unwrap();

        let touched = repo.orphan_rows_of_user(&mut conn, 7).await.unwrap();
        assert_eq!(touched, 1);

        // The row survives but is no longer a current owner
        assert!(repo.owner_ids(&mut conn, blog_id).await.unwrap().is_empty());

        let row = sqlx::query("SELECT user_id, is_owner_exists FROM blog_owners WHERE blog_id = ?")
            .bind(blog_id)
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let user_id: i64 = row.get("user_id");
        let exists: bool = row.get("is_owner_exists");
        assert_eq!(user_id, 0);
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_assign_and_revoke_editor() {
        let (pool, blog_id) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = SqlxBlogEditorRepository::new();

        assert!(!repo.is_editor(&mut conn, blog_id, 9).await.unwrap());

        repo.assign(&mut conn, blog_id, 9).await.unwrap();
        assert!(repo.is_editor(&mut conn, blog_id, 9).await.unwrap());
        assert_eq!(repo.editor_ids(&mut conn, blog_id).await.unwrap(), vec![9]);

        assert!(repo.revoke(&mut conn, blog_id, 9).await.unwrap());
        assert!(!repo.is_editor(&mut conn, blog_id, 9).await.unwrap());
    }
}
