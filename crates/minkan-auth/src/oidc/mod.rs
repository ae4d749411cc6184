//! Identity provider seam.
//!
//! The login flow only needs two things from the provider: a URL to send the
//! browser to, and a verified identity once the browser comes back with a
//! code. [`OidcProvider`] implements both against any OpenID Connect issuer.

pub mod provider;

use async_trait::async_trait;

use minkan_core::AppResult;
use minkan_entity::NewUser;

pub use provider::OidcProvider;

/// Where to send the browser, and the `state` the callback must echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Claims the provider vouched for after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub issuer: String,
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
}

impl From<VerifiedIdentity> for NewUser {
    fn from(identity: VerifiedIdentity) -> Self {
        NewUser {
            oidc_iss: identity.issuer,
            oidc_sub: identity.subject,
            display_name: identity.display_name,
            email: identity.email,
            email_verified: identity.email_verified,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Start an authorization-code login.
    async fn authorization_request(&self) -> AppResult<AuthorizationRequest>;

    /// Redeem `code` for the login started with `state`.
    ///
    /// Fails with `ErrorKind::Authentication` for an unknown or already used
    /// `state` and with `ErrorKind::ExternalService` when the provider
    /// cannot be reached or rejects the exchange.
    async fn exchange(&self, code: &str, state: &str) -> AppResult<VerifiedIdentity>;
}
