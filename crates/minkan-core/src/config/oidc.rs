//! OpenID Connect relying-party configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest accepted wait on the identity provider.
pub const MAX_HTTP_TIMEOUT_SECONDS: u64 = 600;
/// Longest accepted lifetime of an authorization `state`: one day.
pub const MAX_STATE_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Settings for the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OidcConfig {
    /// Issuer URL used for discovery.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Callback URL registered with the provider.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// Send a PKCE challenge with the authorization request.
    #[serde(default = "default_true")]
    pub enable_pkce: bool,
    /// Upper bound for discovery and token exchange round-trips.
    #[serde(default = "default_http_timeout")]
    #[validate(range(min = 1, max = MAX_HTTP_TIMEOUT_SECONDS))]
    pub http_timeout_seconds: u64,
    /// How long an issued authorization `state` stays redeemable.
    #[serde(default = "default_state_ttl")]
    #[validate(range(min = 1, max = MAX_STATE_TTL_SECONDS))]
    pub state_ttl_seconds: u64,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: default_redirect_url(),
            enable_pkce: true,
            http_timeout_seconds: default_http_timeout(),
            state_ttl_seconds: default_state_ttl(),
        }
    }
}

impl OidcConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Lifetime of a pending login, capped at [`MAX_STATE_TTL_SECONDS`].
    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_seconds.min(MAX_STATE_TTL_SECONDS))
    }
}

fn default_issuer() -> String {
    "https://accounts.google.com".to_string()
}

fn default_redirect_url() -> String {
    "http://localhost:8080/v1/auth/callback".to_string()
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> u64 {
    60
}

fn default_state_ttl() -> u64 {
    600
}
