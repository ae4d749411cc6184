//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use minkan_core::UserId;

/// Layout version of the payload written by this build.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Version assigned to a freshly provisioned document.
pub const INITIAL_VERSION: i64 = 1;

/// One row of `minkan_states`: the whole client state of a single owner.
///
/// The payload is opaque to the server. `version` starts at
/// [`INITIAL_VERSION`] and grows by exactly one on every accepted write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentRecord {
    #[sqlx(rename = "user_id")]
    pub owner_id: UserId,
    #[sqlx(rename = "state_json")]
    pub payload: serde_json::Value,
    pub schema_version: i32,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

/// Result of a compare-and-swap write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The payload was stored; `version` is the new version.
    Updated { version: i64 },
    /// Another write got there first. Nothing was changed.
    Conflict { current_version: i64 },
    /// The owner has no document.
    NotFound,
}

impl WriteOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}
