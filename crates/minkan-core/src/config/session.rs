//! Session lifetime and request gate configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest accepted session lifetime: one year.
pub const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    /// Lifetime of a session, also used as the cookie max-age.
    #[serde(default = "default_ttl_minutes")]
    #[validate(range(max = MAX_TTL_MINUTES))]
    pub ttl_minutes: u64,
    /// Mark session and CSRF cookies `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Enforce double-submit CSRF on state-changing requests.
    #[serde(default = "default_true")]
    pub require_csrf: bool,
    /// Path prefixes that bypass the request gate entirely.
    #[serde(default = "default_skip_paths")]
    pub skip_paths: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            cookie_secure: false,
            require_csrf: true,
            skip_paths: default_skip_paths(),
        }
    }
}

impl SessionConfig {
    /// Session TTL as a duration, saturating at `TimeDelta::MAX`.
    pub fn ttl(&self) -> chrono::TimeDelta {
        i64::try_from(self.ttl_minutes)
            .ok()
            .and_then(chrono::TimeDelta::try_minutes)
            .unwrap_or(chrono::TimeDelta::MAX)
    }
}

fn default_ttl_minutes() -> u64 {
    12 * 60
}

fn default_true() -> bool {
    true
}

fn default_skip_paths() -> Vec<String> {
    vec!["/healthz".to_string(), "/v1/auth/".to_string()]
}
