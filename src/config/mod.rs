//! Configuration management
//!
//! This module handles loading and parsing configuration for the Quill
//! blogging service. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token signing configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Blog content limits
    #[serde(default)]
    pub blog: BlogConfig,
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration (SQLite)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path or connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/quill.db".to_string()
}

/// Token signing configuration
///
/// The signing secret and issuer/audience are deployment configuration;
/// the defaults here are only suitable for local development.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret for bearer tokens
    #[serde(default = "default_auth_secret")]
    pub secret: String,
    /// Token issuer
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token audience
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Token validity window in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_auth_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

fn default_auth_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_issuer() -> String {
    "quill".to_string()
}

fn default_audience() -> String {
    "quill-clients".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

/// Blog content limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Maximum number of characters in a blog title
    #[serde(default = "default_title_char_limit")]
    pub title_char_limit: usize,
    /// Maximum number of characters in blog content
    #[serde(default = "default_content_char_limit")]
    pub content_char_limit: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title_char_limit: default_title_char_limit(),
            content_char_limit: default_content_char_limit(),
        }
    }
}

fn default_title_char_limit() -> usize {
    100
}

fn default_content_char_limit() -> usize {
    5000
}

/// Deployment environment
///
/// Controls how much detail error responses carry: development responses
/// include the underlying error chain, production responses do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production (default): terse error responses
    #[default]
    Production,
    /// Development: error responses include extra detail
    Development,
}

impl Environment {
    /// Whether error responses should carry the underlying error chain
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Empty file also falls back to defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - QUILL_SERVER_HOST
    /// - QUILL_SERVER_PORT
    /// - QUILL_DATABASE_URL
    /// - QUILL_AUTH_SECRET
    /// - QUILL_AUTH_ISSUER
    /// - QUILL_AUTH_AUDIENCE
    /// - QUILL_AUTH_TOKEN_TTL_HOURS
    /// - QUILL_BLOG_TITLE_CHAR_LIMIT
    /// - QUILL_BLOG_CONTENT_CHAR_LIMIT
    /// - QUILL_ENVIRONMENT
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("QUILL_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("QUILL_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("QUILL_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("QUILL_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("QUILL_AUTH_SECRET") {
            self.auth.secret = secret;
        }
        if let Ok(issuer) = std::env::var("QUILL_AUTH_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("QUILL_AUTH_AUDIENCE") {
            self.auth.audience = audience;
        }
        if let Ok(ttl) = std::env::var("QUILL_AUTH_TOKEN_TTL_HOURS") {
            if let Ok(ttl) = ttl.parse::<i64>() {
                self.auth.token_ttl_hours = ttl;
            }
        }

        if let Ok(limit) = std::env::var("QUILL_BLOG_TITLE_CHAR_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.blog.title_char_limit = limit;
            }
        }
        if let Ok(limit) = std::env::var("QUILL_BLOG_CONTENT_CHAR_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.blog.content_char_limit = limit;
            }
        }

        if let Ok(env) = std::env::var("QUILL_ENVIRONMENT") {
            match env.to_lowercase().as_str() {
                "production" => self.environment = Environment::Production,
                "development" => self.environment = Environment::Development,
                _ => {} // Ignore invalid values
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
