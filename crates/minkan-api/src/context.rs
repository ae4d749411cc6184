//! Identity attached to a request by the session gate.

use minkan_core::UserId;

/// Who is acting, and through which session.
///
/// Inserted into the request extensions by the gate and read back by the
/// [`AuthUser`](crate::extractors::AuthUser) extractor. Never present on
/// requests that bypassed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    /// Raw token from the `session_id` cookie.
    pub session_token: String,
}

impl RequestContext {
    pub fn new(user_id: UserId, session_token: impl Into<String>) -> Self {
        Self {
            user_id,
            session_token: session_token.into(),
        }
    }
}
