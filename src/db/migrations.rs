//! Database migrations
//!
//! Code-based migrations for the Quill blogging service. All migrations
//! are embedded as SQL strings so a single binary can bootstrap its own
//! schema. Applied versions are recorded in `schema_migrations`.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i64,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// All migrations for the Quill blogging service.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users_and_roles",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY,
                name VARCHAR(20) NOT NULL UNIQUE
            );
            INSERT OR IGNORE INTO roles (id, name) VALUES (1, 'ADMIN');
            INSERT OR IGNORE INTO roles (id, name) VALUES (2, 'BLOGGER');

            CREATE TABLE IF NOT EXISTS user_roles (
                user_id INTEGER NOT NULL,
                role_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, role_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (role_id) REFERENCES roles(id)
            );
        "#,
    },
    Migration {
        version: 2,
        name: "create_blogs",
        up: r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                likes INTEGER NOT NULL DEFAULT 0
            );
        "#,
    },
    Migration {
        version: 3,
        name: "create_blog_roles",
        // No foreign key on user_id: deleting a user zeroes the column
        // instead of removing the row.
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_owners (
                user_id INTEGER NOT NULL,
                blog_id INTEGER NOT NULL,
                owner_name VARCHAR(100) NOT NULL,
                is_owner_exists INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_blog_owners_blog_id ON blog_owners(blog_id);
            CREATE INDEX IF NOT EXISTS idx_blog_owners_user_id ON blog_owners(user_id);

            CREATE TABLE IF NOT EXISTS blog_editors (
                blog_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                PRIMARY KEY (blog_id, user_id),
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 4,
        name: "create_blog_likes",
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_likes (
                blog_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                UNIQUE (blog_id, user_id),
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 5,
        name: "create_blog_comments",
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                user_name VARCHAR(100) NOT NULL,
                is_user_exists INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_blog_comments_blog_id ON blog_comments(blog_id);
        "#,
    },
];

/// Run all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }

        tracing::info!(
            "Applying migration {} ({})",
            migration.version,
            migration.name
        );

        // SQLite executes one statement per call, split on ';'
        for statement in migration.up.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(pool).await.with_context(|| {
                format!(
                    "Migration {} ({}) failed on: {}",
                    migration.version, migration.name, statement
                )
            })?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(pool)
            .await
            .context("Failed to record migration")?;
    }

    Ok(())
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    Ok(rows.iter().map(|row| row.get("version")).collect())
}
