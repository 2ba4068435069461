//! Quill - A multi-user blogging web API

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxBlogCommentRepository, SqlxBlogEditorRepository, SqlxBlogLikeRepository,
            SqlxBlogOwnerRepository, SqlxBlogRepository, SqlxUserRepository,
            SqlxUserRoleRepository,
        },
    },
    services::{BlogService, TokenService, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quill blogging API...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded ({:?})", config.environment);

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed();
    let user_role_repo = SqlxUserRoleRepository::boxed();
    let blog_repo = SqlxBlogRepository::boxed();
    let owner_repo = SqlxBlogOwnerRepository::boxed();
    let editor_repo = SqlxBlogEditorRepository::boxed();
    let like_repo = SqlxBlogLikeRepository::boxed();
    let comment_repo = SqlxBlogCommentRepository::boxed();

    // Initialize services
    let tokens = TokenService::new(&config.auth);
    let user_service = Arc::new(UserService::new(
        pool.clone(),
        user_repo.clone(),
        user_role_repo.clone(),
        owner_repo.clone(),
        comment_repo.clone(),
        tokens.clone(),
    ));
    let blog_service = Arc::new(BlogService::new(
        pool.clone(),
        blog_repo,
        owner_repo,
        editor_repo,
        like_repo,
        comment_repo,
        user_repo,
        user_role_repo,
        config.blog.clone(),
    ));

    // Build application state
    let state = AppState {
        user_service,
        blog_service,
        tokens,
        dev_mode: config.environment.is_development(),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
