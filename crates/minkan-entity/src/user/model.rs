//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use minkan_core::UserId;

/// A user known through an external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Surrogate key.
    pub user_id: UserId,
    /// Issuer that authenticated the user.
    pub oidc_iss: String,
    /// Subject identifier, unique per issuer.
    pub oidc_sub: String,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Identity asserted by the provider, used to find or provision a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub oidc_iss: String,
    pub oidc_sub: String,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
}
