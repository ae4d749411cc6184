//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use minkan_core::error::{AppError, ErrorKind};
use minkan_core::{AppResult, UserId};
use minkan_entity::{NewUser, User};

use super::document::DocumentRepository;
use crate::store::UserStore;

const USER_COLUMNS: &str = "user_id, oidc_iss, oidc_sub, display_name, email, email_verified, \
                            created_at, updated_at, last_login_at";

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_oidc(&self, iss: &str, sub: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE oidc_iss = $1 AND oidc_sub = $2"
        ))
        .bind(iss)
        .bind(sub)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by OIDC", e))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn provision(&self, new_user: &NewUser) -> AppResult<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (oidc_iss, oidc_sub, display_name, email, email_verified)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (oidc_iss, oidc_sub) DO NOTHING
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&new_user.oidc_iss)
        .bind(&new_user.oidc_sub)
        .bind(&new_user.display_name)
        .bind(&new_user.email)
        .bind(new_user.email_verified)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))?;

        let Some(user) = inserted else {
            // Someone else provisioned this subject first; their rows are committed.
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back", e)
            })?;
            return self
                .find_by_oidc(&new_user.oidc_iss, &new_user.oidc_sub)
                .await?
                .ok_or_else(|| AppError::internal("User vanished during provisioning"));
        };

        DocumentRepository::provision(&mut *tx, user.user_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit user provisioning", e)
        })?;

        info!(user_id = %user.user_id, iss = %user.oidc_iss, "Provisioned new user");
        Ok(user)
    }

    async fn touch_last_login(&self, id: UserId) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last login", e)
            })?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
