//! Blog repository
//!
//! Database operations for blog posts, including the denormalized like
//! counter. The increment/decrement statements are issued by the service
//! inside the same transaction as the like-row insert/delete.

use crate::models::Blog;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new blog row and return it with its assigned id
    async fn create(&self, conn: &mut SqliteConnection, blog: &Blog) -> Result<Blog>;

    /// Get blog by ID
    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<Blog>>;

    /// List all blogs
    async fn list_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Blog>>;

    /// Update title and content; returns whether a row was changed
    async fn update(&self, conn: &mut SqliteConnection, blog: &Blog) -> Result<bool>;

    /// Delete a blog row; returns whether a row was removed
    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool>;

    /// Bump the like counter up by one
    async fn increment_likes(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool>;

    /// Bump the like counter down by one
    async fn decrement_likes(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool>;
}

/// SQLx-based blog repository implementation
pub struct SqlxBlogRepository;

impl SqlxBlogRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a boxed repository for injection into services
    pub fn boxed() -> Arc<dyn BlogRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxBlogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, conn: &mut SqliteConnection, blog: &Blog) -> Result<Blog> {
        let result = sqlx::query("INSERT INTO blogs (title, content, likes) VALUES (?, ?, 0)")
            .bind(&blog.title)
            .bind(&blog.content)
            .execute(conn)
            .await
            .context("Failed to create blog")?;

        Ok(Blog {
            id: result.last_insert_rowid(),
            title: blog.title.clone(),
            content: blog.content.clone(),
            likes: 0,
        })
    }

    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<Blog>> {
        let row = sqlx::query("SELECT id, title, content, likes FROM blogs WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
            .context("Failed to get blog by ID")?;

        Ok(row.map(|row| row_to_blog(&row)))
    }

    async fn list_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Blog>> {
        let rows = sqlx::query("SELECT id, title, content, likes FROM blogs ORDER BY id")
            .fetch_all(conn)
            .await
            .context("Failed to list blogs")?;

        Ok(rows.iter().map(row_to_blog).collect())
    }

    async fn update(&self, conn: &mut SqliteConnection, blog: &Blog) -> Result<bool> {
        let result = sqlx::query("UPDATE blogs SET title = ?, content = ? WHERE id = ?")
            .bind(&blog.title)
            .bind(&blog.content)
            .bind(blog.id)
            .execute(conn)
            .await
            .context("Failed to update blog")?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete blog")?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_likes(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE blogs SET likes = likes + 1 WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to increment likes")?;

        Ok(result.rows_affected() == 1)
    }

    async fn decrement_likes(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE blogs SET likes = likes - 1 WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to decrement likes")?;

        Ok(result.rows_affected() == 1)
    }
}

fn row_to_blog(row: &sqlx::sqlite::SqliteRow) -> Blog {
    Blog {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        likes: row.get("likes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, SqlxBlogRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (pool, SqlxBlogRepository::new())
    }

    #[tokio::test]
    async fn test_create_and_get_blog() {
        let (pool, repo) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let created = repo
            .create(&mut conn, &Blog::new("Title".to_string(), "Body".to_string()))
            .await
            .expect("Failed to create blog");

        assert!(created.id > 0);
        assert_eq!(created.likes, 0);

        let found = repo
            .find_by_id(&mut conn, created.id)
            .await
            .unwrap()
            .expect("Blog not found");
        assert_eq!(found.title, "Title");
        assert_eq!(found.content, "Body");
    }

    #[tokio::test]
    async fn test_list_all_blogs() {
        let (pool, repo) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        repo.create(&mut conn, &Blog::new("One".to_string(), "a".to_string()))
            .await
            .unwrap();
        repo.create(&mut conn, &Blog::new("Two".to_string(), "b".to_string()))
            .await
            .unwrap();

        let blogs = repo.list_all(&mut conn).await.unwrap();
        assert_eq!(blogs.len(), 2);
        assert_eq!(blogs[0].title, "One");
    }

    #[tokio::test]
    async fn test_update_blog() {
        let (pool, repo) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut blog = repo
            .create(&mut conn, &Blog::new("Old".to_string(), "old".to_string()))
            .await
            .unwrap();
        blog.title = "New".to_string();
        blog.content = "new".to_string();

        assert!(repo.update(&mut conn, &blog).await.unwrap());

        let found = repo.find_by_id(&mut conn, blog.id).await.unwrap().unwrap();
        assert_eq!(found.title, "New");
    }

    #[tokio::test]
    async fn test_delete_blog() {
        let (pool, repo) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let blog = repo
            .create(&mut conn, &Blog::new("T".to_string(), "c".to_string()))
            .await
            .unwrap();

        assert!(repo.delete(&mut conn, blog.id).await.unwrap());
        assert!(repo.find_by_id(&mut conn, blog.id).await.unwrap().is_none());
        assert!(!repo.delete(&mut conn, blog.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_like_counter_round_trip() {
        let (pool, repo) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let blog = repo
            .create(&mut conn, &Blog::new("T".to_string(), "c".to_string()))
            .await
            .unwrap();

        repo.increment_likes(&mut conn, blog.id).await.unwrap();
        repo.increment_likes(&mut conn, blog.id).await.unwrap();
        repo.decrement_likes(&mut conn, blog.id).await.unwrap();

        let found = repo.find_by_id(&mut conn, blog.id).await.unwrap().unwrap();
        assert_eq!(found.likes, 1);
    }
}
