//! Response DTOs.

use serde::{Deserialize, Serialize};

use minkan_core::UserId;
use minkan_entity::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /v1/minkan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinkanResponse {
    pub minkan: serde_json::Value,
    pub version: i64,
}

/// Body of a successful `PUT /v1/minkan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
            email: user.email,
            email_verified: user.email_verified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: String,
    /// Where the frontend should navigate next.
    pub redirect_to: String,
}
