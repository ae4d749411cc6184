//! Schema setup: the embedded migrations plus a check that the tables the
//! repositories query are present.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{info, warn};

use minkan_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Tables read and written by [`crate::UserRepository`] and
/// [`crate::DocumentRepository`].
pub const REQUIRED_TABLES: [&str; 2] = ["users", "minkan_states"];

/// Apply pending migrations when `apply` is set, then verify the schema.
pub async fn prepare_schema(pool: &PgPool, apply: bool) -> Result<(), AppError> {
    if apply {
        run_migrations(pool).await?;
    } else {
        warn!("database.run_migrations is off, expecting an existing schema");
    }
    check_schema(pool).await
}

/// Apply every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max();
    info!(known = MIGRATOR.iter().count(), latest = ?latest, "Applying schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    Ok(())
}

/// Fail with a configuration error naming every missing table.
pub async fn check_schema(pool: &PgPool) -> Result<(), AppError> {
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let present: bool = sqlx::query_scalar("SELECT to_regclass($1::text) IS NOT NULL")
            .bind(format!("public.{table}"))
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema check failed", e))?;
        if !present {
            missing.push(table);
        }
    }

    if !missing.is_empty() {
        return Err(AppError::configuration(format!(
            "Database schema is missing tables: {} (apply migrations/ or set database.run_migrations)",
            missing.join(", ")
        )));
    }

    info!(tables = ?REQUIRED_TABLES, "Document schema ready");
    Ok(())
}
