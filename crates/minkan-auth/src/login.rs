//! Login and logout orchestration.
//!
//! This is the only place that creates sessions. Cookie handling stays in
//! the HTTP layer; the flow hands back the raw tokens and lifetime.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use minkan_core::error::AppError;
use minkan_core::{AppResult, UserId};
use minkan_database::UserStore;
use minkan_entity::NewUser;

use crate::csrf::{generate_token, verify_double_submit};
use crate::oidc::{AuthorizationRequest, IdentityProvider};
use crate::session::SessionStore;

/// Outcome of a successful callback.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub user_id: UserId,
    pub session_token: String,
    pub csrf_token: String,
    /// Cookie max-age; equals the session TTL.
    pub max_age: Duration,
    pub redirect_to: String,
}

#[derive(Clone)]
pub struct LoginFlow {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
    sessions: SessionStore,
    redirect_after_login: String,
}

impl LoginFlow {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        sessions: SessionStore,
        redirect_after_login: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            users,
            sessions,
            redirect_after_login: redirect_after_login.into(),
        }
    }

    /// Ask the identity provider where to send the browser.
    pub async fn begin(&self) -> AppResult<AuthorizationRequest> {
        self.provider.authorization_request().await
    }

    /// Finish a login: verify the code, resolve or provision the user, and
    /// register a fresh session.
    pub async fn complete(&self, code: &str, state: &str) -> AppResult<EstablishedSession> {
        if code.is_empty() {
            return Err(AppError::authentication("Missing authorization code"));
        }

        let identity = self.provider.exchange(code, state).await?;

        let user = match self
            .users
            .find_by_oidc(&identity.issuer, &identity.subject)
            .await?
        {
            Some(user) => user,
            None => self.users.provision(&NewUser::from(identity)).await?,
        };
        self.users.touch_last_login(user.user_id).await?;

        let session_token = generate_token();
        let csrf_token = generate_token();
        self.sessions.create(session_token.clone(), user.user_id).await;

        info!(user_id = %user.user_id, "User logged in");

        Ok(EstablishedSession {
            user_id: user.user_id,
            session_token,
            csrf_token,
            max_age: self.sessions.ttl(),
            redirect_to: self.redirect_after_login.clone(),
        })
    }

    /// End the session named by the cookie.
    ///
    /// Runs outside the request gate, so it checks the session cookie and
    /// the CSRF pair itself. Deleting an unknown or expired session succeeds.
    pub async fn logout(
        &self,
        session_cookie: Option<&str>,
        csrf_header: Option<&str>,
        csrf_cookie: Option<&str>,
    ) -> AppResult<()> {
        let Some(token) = session_cookie.filter(|t| !t.is_empty()) else {
            return Err(AppError::authentication("No session"));
        };

        if !verify_double_submit(csrf_header, csrf_cookie) {
            warn!("Logout rejected: CSRF token mismatch");
            return Err(AppError::authorization("CSRF token mismatch"));
        }

        match self.sessions.get(token).await {
            Some(user_id) => info!(user_id = %user_id, "User logged out"),
            None => info!("Logout for unknown or expired session"),
        }
        self.sessions.delete(token).await;
        Ok(())
    }
}
