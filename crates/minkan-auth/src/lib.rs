//! # minkan-auth
//!
//! Everything that turns an identity-provider login into a browser session:
//! the in-memory [`SessionStore`], token and CSRF helpers, the OpenID Connect
//! relying party behind [`IdentityProvider`], and the [`LoginFlow`] that ties
//! them to the user directory.

pub mod csrf;
pub mod login;
pub mod oidc;
pub mod session;

pub use login::{EstablishedSession, LoginFlow};
pub use oidc::{AuthorizationRequest, IdentityProvider, OidcProvider, VerifiedIdentity};
pub use session::{Clock, ManualClock, SessionStore, SystemClock};
