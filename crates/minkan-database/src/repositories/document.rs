//! Versioned document repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use minkan_core::error::{AppError, ErrorKind};
use minkan_core::{AppResult, UserId};
use minkan_entity::document::{
    CURRENT_SCHEMA_VERSION, DocumentRecord, INITIAL_VERSION, WriteOutcome, default_payload,
};

use crate::store::DocumentStore;

/// Repository for the `minkan_states` table.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the default document for `owner` on the caller's connection.
    ///
    /// Meant to run inside the transaction that creates the owner so the two
    /// rows appear together or not at all.
    pub async fn provision(conn: &mut PgConnection, owner: UserId) -> AppResult<()> {
        let payload = default_payload(Utc::now())?;

        sqlx::query(
            r#"INSERT INTO minkan_states (user_id, state_json, schema_version, version)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(owner)
        .bind(&payload)
        .bind(CURRENT_SCHEMA_VERSION)
        .bind(INITIAL_VERSION)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to provision document", e))?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn read(&self, owner: UserId) -> AppResult<DocumentRecord> {
        sqlx::query_as::<_, DocumentRecord>(
            r#"SELECT user_id, state_json, schema_version, version, updated_at
               FROM minkan_states
               WHERE user_id = $1"#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read document", e))?
        .ok_or_else(|| AppError::not_found(format!("No document for user {owner}")))
    }

    async fn write(
        &self,
        owner: UserId,
        payload: &serde_json::Value,
        expected_version: i64,
    ) -> AppResult<WriteOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"UPDATE minkan_states
               SET state_json = $1, version = version + 1, updated_at = NOW()
               WHERE user_id = $2 AND version = $3
               RETURNING version"#,
        )
        .bind(payload)
        .bind(owner)
        .bind(expected_version)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write document", e))?;

        let outcome = match updated {
            Some(version) => WriteOutcome::Updated { version },
            None => {
                // Nothing matched: either the row is missing or its version moved on.
                let current: Option<i64> =
                    sqlx::query_scalar("SELECT version FROM minkan_states WHERE user_id = $1")
                        .bind(owner)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to inspect document version",
                                e,
                            )
                        })?;
                match current {
                    Some(current_version) => WriteOutcome::Conflict { current_version },
                    None => WriteOutcome::NotFound,
                }
            }
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit document write", e)
        })?;

        debug!(user_id = %owner, expected_version, ?outcome, "Document write");
        Ok(outcome)
    }
}
