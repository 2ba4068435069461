//! Blog comment repository
//!
//! Comments carry the author's id plus a denormalized name and an
//! `is_user_exists` flag, so deleting the author preserves the thread.

use crate::models::BlogComment;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// Blog comment repository trait
#[async_trait]
pub trait BlogCommentRepository: Send + Sync {
    /// Insert a transient comment and return it with its assigned id
    async fn create(
        &self,
        conn: &mut SqliteConnection,
        comment: &BlogComment,
    ) -> Result<BlogComment>;

    /// Get comment by ID
    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64)
        -> Result<Option<BlogComment>>;

    /// Replace the text of an existing comment
    async fn update_text(&self, conn: &mut SqliteConnection, id: i64, text: &str) -> Result<bool>;

    /// Delete a comment row; returns whether a row was removed
    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool>;

    /// All comments on a blog, oldest first
    async fn list_for_blog(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
    ) -> Result<Vec<BlogComment>>;

    /// Soft-orphan every comment of a deleted user: clear the flag and
    /// zero the user id. Returns the number of rows touched.
    async fn orphan_rows_of_user(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<u64>;
}

/// SQLx-based blog comment repository implementation
pub struct SqlxBlogCommentRepository;

impl SqlxBlogCommentRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Arc<dyn BlogCommentRepository> {
        Arc::new(Self::new())
    }
}

impl Default for SqlxBlogCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogCommentRepository for SqlxBlogCommentRepository {
    async fn create(
        &self,
        conn: &mut SqliteConnection,
        comment: &BlogComment,
    ) -> Result<BlogComment> {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_comments (blog_id, user_id, text, created_at, user_name, is_user_exists)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.blog_id)
        .bind(comment.user_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .bind(&comment.user_name)
        .bind(comment.is_user_exists)
        .execute(conn)
        .await
        .context("Failed to create comment")?;

        Ok(BlogComment {
            id: result.last_insert_rowid(),
            ..comment.clone()
        })
    }

    async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<BlogComment>> {
        let row = sqlx::query(
            r#"
            SELECT id, blog_id, user_id, text, created_at, user_name, is_user_exists
            FROM blog_comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to get comment by ID")?;

        Ok(row.map(|row| row_to_comment(&row)))
    }

    async fn update_text(&self, conn: &mut SqliteConnection, id: i64, text: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE blog_comments SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to update comment")?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_comments WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete comment")?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_blog(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
    ) -> Result<Vec<BlogComment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, blog_id, user_id, text, created_at, user_name, is_user_exists
            FROM blog_comments
            WHERE blog_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(blog_id)
        .fetch_all(conn)
        .await
        .context("Failed to list comments")?;

        Ok(rows.iter().map(row_to_comment).collect())
    }

    async fn orphan_rows_of_user(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE blog_comments SET is_user_exists = 0, user_id = 0 WHERE user_id = ?",
        )
        .bind(user_id)
        .execute(conn)
        .await
        .context("Failed to orphan comment rows")?;

        Ok(result.rows_affected())
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> BlogComment {
    BlogComment {
        id: row.get("id"),
        blog_id: row.get("blog_id"),
        user_id: row.get("user_id"),
        text: row.get("text"),
        created_at: row.get("created_at"),
        user_name: row.get("user_name"),
        is_user_exists: row.get("is_user_exists"),
    }
}
