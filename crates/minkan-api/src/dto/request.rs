//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

/// Body of `PUT /v1/minkan`.
///
/// `version` is the version the client last read; the write only lands if
/// the stored document is still at that version.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PutMinkanRequest {
    #[serde(alias = "document")]
    pub minkan: serde_json::Value,
    #[validate(range(min = 1))]
    pub version: i64,
}

/// Query string of the identity provider's redirect back to us.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined or the request failed.
    pub error: Option<String>,
}
