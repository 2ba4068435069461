//! Bearer token issuance and validation
//!
//! Signed HS256 tokens carrying the user's id, email, name and role. The
//! signing secret, issuer, audience and validity window come from
//! deployment configuration.

use crate::config::AuthConfig;
use crate::models::{Role, User};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// User email
    pub email: String,
    /// User display name
    pub name: String,
    /// Application role
    pub role: Role,
    /// Expiry (unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// Issues and validates signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Sign a token for the given user and role.
    pub fn issue(&self, user: &User, role: Role) -> Result<String> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role,
            exp: (Utc::now() + self.ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Decode and validate a token, checking signature, expiry, issuer
    /// and audience.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid token")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&AuthConfig {
            secret: "test-secret".to_string(),
            issuer: "quill-test".to_string(),
            audience: "quill-test-clients".to_string(),
            token_ttl_hours: 24,
        })
    }

    fn test_user() -> User {
        User {
            id: 42,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_issue_and_decode_round_trip() {
        let service = test_service();
        let token = service.issue(&test_user(), Role::Blogger).unwrap();

        let claims = service.decode(&token).expect("Token should validate");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.role, Role::Blogger);
        assert_eq!(claims.iss, "quill-test");
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(&AuthConfig {
            secret: "test-secret".to_string(),
            issuer: "quill-test".to_string(),
            audience: "quill-test-clients".to_string(),
            token_ttl_hours: -1,
        });

        let token = service.issue(&test_user(), Role::Blogger).unwrap();
        assert!(service.decode(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = test_service().issue(&test_user(), Role::Admin).unwrap();

        let other = TokenService::new(&AuthConfig {
            secret: "different-secret".to_string(),
            issuer: "quill-test".to_string(),
            audience: "quill-test-clients".to_string(),
            token_ttl_hours: 24,
        });

        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = test_service().issue(&test_user(), Role::Blogger).unwrap();

        let other = TokenService::new(&AuthConfig {
            secret: "test-secret".to_string(),
            issuer: "someone-else".to_string(),
            audience: "quill-test-clients".to_string(),
            token_ttl_hours: 24,
        });

        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(test_service().decode("not.a.token").is_err());
    }

    #[test]
    fn test_role_claim_survives_round_trip() {
        let service = test_service();
        let token = service.issue(&test_user(), Role::Admin).unwrap();
        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.role, Role::Admin);
    }
}
