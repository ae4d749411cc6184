//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use minkan_auth::{IdentityProvider, LoginFlow, SessionStore};
use minkan_core::config::AppConfig;
use minkan_database::{DocumentStore, UserStore};

use crate::middleware::auth::AuthGate;

/// Shared dependencies, passed to every handler via `State<AppState>`.
///
/// Everything is `Arc`-backed, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Token to user mapping for live sessions.
    pub sessions: SessionStore,
    /// Login/logout orchestration.
    pub login: Arc<LoginFlow>,
    /// Request gate applied in front of the protected routes.
    pub gate: AuthGate,

    // ── Storage ──────────────────────────────────────────────
    pub users: Arc<dyn UserStore>,
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Wire the state from its parts. The session store is shared by the
    /// login flow and the gate.
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let sessions = SessionStore::from_config(&config.session);
        Self::with_sessions(config, sessions, provider, users, documents)
    }

    /// Like [`AppState::new`] but with a caller-built session store, e.g.
    /// one driven by a [`minkan_auth::ManualClock`].
    pub fn with_sessions(
        config: AppConfig,
        sessions: SessionStore,
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let login = LoginFlow::new(
            provider,
            Arc::clone(&users),
            sessions.clone(),
            config.login.redirect_after_login.clone(),
        );
        let gate = AuthGate::new(sessions.clone(), &config.session);

        Self {
            config: Arc::new(config),
            sessions,
            login: Arc::new(login),
            gate,
            users,
            documents,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
