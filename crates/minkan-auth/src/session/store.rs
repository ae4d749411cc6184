//! In-memory session store with lazy TTL expiry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use minkan_core::UserId;
use minkan_core::config::SessionConfig;

use super::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Maps opaque session tokens to the user they authenticate.
///
/// One mutex guards the whole map and no critical section awaits anything
/// else, so every operation is atomic with respect to the others. Entries are
/// never swept in the background: an expired entry is removed by the first
/// [`get`](Self::get) that observes it. Contents do not survive a restart.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<String, SessionEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.ttl())
    }

    /// Lifetime given to every new session.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Register `token` for `user_id`, replacing any previous entry.
    pub async fn create(&self, token: impl Into<String>, user_id: UserId) {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.entries.lock().await;
        entries.insert(
            token.into(),
            SessionEntry {
                user_id,
                expires_at,
            },
        );
    }

    /// Resolve `token` to its user.
    ///
    /// A session is valid while `now < expires_at`. Expired entries are
    /// dropped here and reported as absent.
    pub async fn get(&self, token: &str) -> Option<UserId> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let entry = *entries.get(token)?;
        if now < entry.expires_at {
            return Some(entry.user_id);
        }

        entries.remove(token);
        debug!(user_id = %entry.user_id, "Dropped expired session");
        None
    }

    /// Remove `token`. Removing an unknown token is a no-op.
    pub async fn delete(&self, token: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(token);
    }

    /// Number of stored entries, including expired ones not yet observed.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
