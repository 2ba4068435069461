//! Blog like repository
//!
//! One row per (blog, user) pair; presence means "liked". The UNIQUE
//! constraint backs up the service-level idempotency guard.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// Blog like repository trait
#[async_trait]
pub trait BlogLikeRepository: Send + Sync {
    /// Insert a like row
    async fn like(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64) -> Result<bool>;

    /// Remove a like row
    async fn unlike(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64)
        -> Result<bool>;

    /// Whether the user has liked the blog
    async fn is_liked(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64)
        -> Result<bool>;

    /// Number of like rows for the blog
    async fn count_for_blog(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<i64>;
}

/// SQLx-based blog like repository implementation
pub struct SqlxBlogLikeRepository;

impl SqlxBlogLikeRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Arc<dyn BlogLikeRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxBlogLikeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogLikeRepository for SqlxBlogLikeRepository {
    async fn like(&self, conn: &mut SqliteConnection, blog_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("INSERT INTO blog_likes (blog_id, user_id) VALUES (?, ?)")
            .bind(blog_id)
            .bind(user_id)
            .execute(conn)
            .await
            .context("Failed to insert like")?;

        Ok(result.rows_affected() == 1)
    }

    async fn unlike(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_likes WHERE blog_id = ? AND user_id = ?")
            .bind(blog_id)
            .bind(user_id)
            .execute(conn)
            .await
            .context("Failed to delete like")?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_liked(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let row = sqlx::query("SELECT user_id FROM blog_likes WHERE blog_id = ? AND user_id = ?")
            .bind(blog_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .context("Failed to check like")?;

        Ok(row.is_some())
    }

    async fn count_for_blog(&self, conn: &mut SqliteConnection, blog_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM blog_likes WHERE blog_id = ?")
            .bind(blog_id)
            .fetch_one(conn)
            .await
            .context("Failed to count likes")?;

        Ok(row.get("count"))
    }
}
