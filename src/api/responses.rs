//! Shared API response types

use serde::Serialize;

use crate::models::User;
use crate::services::user::UserAccount;

/// Success envelope for mutations: `{isSuccess: true, message}`
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    #[serde(rename = "isSuccess")]
    pub is_success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            message: message.into(),
        }
    }
}

/// User info returned by auth and user-management endpoints. The token is
/// present only when the operation issued one.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<UserAccount> for UserInfo {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.user.id,
            name: account.user.name,
            email: account.user.email,
            role: account.role.to_string(),
            token: account.token,
        }
    }
}

/// A user reference inside the authors listing
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// The owners and editors of a blog
#[derive(Debug, Serialize)]
pub struct BlogAuthorsResponse {
    pub owners: Vec<UserSummary>,
    pub editors: Vec<UserSummary>,
}
