//! In-memory user directory and document store for single-node development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use minkan_core::error::AppError;
use minkan_core::{AppResult, UserId};
use minkan_entity::document::{
    CURRENT_SCHEMA_VERSION, DocumentRecord, INITIAL_VERSION, WriteOutcome, default_payload,
};
use minkan_entity::{NewUser, User};

use crate::store::{DocumentStore, UserStore};

#[derive(Debug, Default)]
struct InnerState {
    /// Last assigned user key.
    last_user_id: i64,
    users: HashMap<UserId, User>,
    /// `(issuer, subject)` to user key.
    by_subject: HashMap<(String, String), UserId>,
    documents: HashMap<UserId, DocumentRecord>,
}

/// Users and documents kept in process memory behind one Tokio mutex.
///
/// Every operation runs entirely inside the lock, which makes the
/// compare-and-swap in [`DocumentStore::write`] atomic. Contents are lost on
/// restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `owner` a fresh default document, replacing any existing one.
    pub async fn provision_document(&self, owner: UserId) -> AppResult<DocumentRecord> {
        let record = new_document(owner)?;
        let mut state = self.state.lock().await;
        state.documents.insert(owner, record.clone());
        Ok(record)
    }
}

fn new_document(owner: UserId) -> AppResult<DocumentRecord> {
    let now = Utc::now();
    Ok(DocumentRecord {
        owner_id: owner,
        payload: default_payload(now)?,
        schema_version: CURRENT_SCHEMA_VERSION,
        version: INITIAL_VERSION,
        updated_at: now,
    })
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_oidc(&self, iss: &str, sub: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        let key = (iss.to_string(), sub.to_string());
        Ok(state
            .by_subject
            .get(&key)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn provision(&self, new_user: &NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;

        let key = (new_user.oidc_iss.clone(), new_user.oidc_sub.clone());
        if let Some(existing) = state.by_subject.get(&key).and_then(|id| state.users.get(id)) {
            return Ok(existing.clone());
        }

        let user_id = UserId::new(state.last_user_id + 1);
        // Build the document before touching the maps so a failure leaves no user behind.
        let document = new_document(user_id)?;

        let now = Utc::now();
        let user = User {
            user_id,
            oidc_iss: new_user.oidc_iss.clone(),
            oidc_sub: new_user.oidc_sub.clone(),
            display_name: new_user.display_name.clone(),
            email: new_user.email.clone(),
            email_verified: new_user.email_verified,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        state.last_user_id = user_id.get();
        state.by_subject.insert(key, user_id);
        state.users.insert(user_id, user.clone());
        state.documents.insert(user_id, document);

        info!(user_id = %user_id, iss = %user.oidc_iss, "Provisioned new user");
        Ok(user)
    }

    async fn touch_last_login(&self, id: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            let now = Utc::now();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.remove(&id) else {
            return Ok(false);
        };
        state.by_subject.remove(&(user.oidc_iss, user.oidc_sub));
        state.documents.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, owner: UserId) -> AppResult<DocumentRecord> {
        let state = self.state.lock().await;
        state
            .documents
            .get(&owner)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("No document for user {owner}")))
    }

    async fn write(
        &self,
        owner: UserId,
        payload: &serde_json::Value,
        expected_version: i64,
    ) -> AppResult<WriteOutcome> {
        let mut state = self.state.lock().await;
        let Some(record) = state.documents.get_mut(&owner) else {
            return Ok(WriteOutcome::NotFound);
        };

        if record.version != expected_version {
            return Ok(WriteOutcome::Conflict {
                current_version: record.version,
            });
        }

        record.payload = payload.clone();
        record.version += 1;
        record.updated_at = Utc::now();
        Ok(WriteOutcome::Updated {
            version: record.version,
        })
    }
}
