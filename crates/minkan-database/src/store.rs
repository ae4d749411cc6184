//! Storage seams used by the auth and API layers.

use async_trait::async_trait;

use minkan_core::{AppResult, UserId};
use minkan_entity::{DocumentRecord, NewUser, User, WriteOutcome};

/// Directory of users known through the identity provider.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Look a user up by issuer and subject.
    async fn find_by_oidc(&self, iss: &str, sub: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Create the user together with its default document.
    ///
    /// Both rows are written atomically. When a user with the same issuer and
    /// subject already exists (for example a concurrent first login), that
    /// user is returned and nothing is written.
    async fn provision(&self, new_user: &NewUser) -> AppResult<User>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: UserId) -> AppResult<()>;

    /// Delete the user and, through the cascade, its document.
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// Per-user document guarded by a version number.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Current payload and version.
    ///
    /// Fails with `ErrorKind::NotFound` when the owner has no document.
    async fn read(&self, owner: UserId) -> AppResult<DocumentRecord>;

    /// Replace the payload if the stored version equals `expected_version`.
    ///
    /// The comparison and the update are a single atomic step; a stale
    /// expectation is reported as [`WriteOutcome::Conflict`] and never
    /// applied.
    async fn write(
        &self,
        owner: UserId,
        payload: &serde_json::Value,
        expected_version: i64,
    ) -> AppResult<WriteOutcome>;
}
