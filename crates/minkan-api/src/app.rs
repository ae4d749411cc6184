//! Application builder: picks the storage backend and wires the state.

use std::sync::Arc;

use minkan_auth::OidcProvider;
use minkan_core::config::{AppConfig, DatabaseProvider};
use minkan_core::error::AppError;
use minkan_database::migration::prepare_schema;
use minkan_database::{
    DatabasePool, DocumentRepository, DocumentStore, MemoryStore, UserRepository, UserStore,
};

use crate::state::AppState;

/// Build the state for a running server.
///
/// Connects to the configured storage backend, applies migrations when
/// asked to, and discovers the OIDC issuer.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    tracing::info!(
        "Initializing storage (provider: {})...",
        config.database.provider
    );

    let (users, documents): (Arc<dyn UserStore>, Arc<dyn DocumentStore>) =
        match config.database.provider {
            DatabaseProvider::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                let store = MemoryStore::new();
                (Arc::new(store.clone()), Arc::new(store))
            }
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(&config.database).await?;
                prepare_schema(db.pool(), config.database.run_migrations).await?;
                let pool = db.into_pool();
                (
                    Arc::new(UserRepository::new(pool.clone())),
                    Arc::new(DocumentRepository::new(pool)),
                )
            }
        };

    tracing::info!("Discovering OIDC issuer {}...", config.oidc.issuer);
    let provider = OidcProvider::discover(&config.oidc).await?;

    Ok(AppState::new(config, Arc::new(provider), users, documents))
}
