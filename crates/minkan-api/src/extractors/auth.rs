//! `AuthUser` extractor: the identity the session gate attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use minkan_core::error::AppError;

use crate::context::RequestContext;
use crate::error::ApiError;

/// Authenticated caller, available to handlers behind the session gate.
///
/// Rejects with 401 when the gate did not run for this request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!(path = %parts.uri.path(), "Handler reached without request context");
                ApiError(AppError::authentication("No authenticated user"))
            })
    }
}
