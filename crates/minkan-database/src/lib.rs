//! # minkan-database
//!
//! Persistence for the Mind-Kanban backend: the PostgreSQL pool and
//! migrations, the user directory, and the per-user document with
//! optimistic concurrency. Callers depend on the [`UserStore`] and
//! [`DocumentStore`] traits; [`MemoryStore`] implements both without a
//! database for local development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{DocumentRepository, UserRepository};
pub use store::{DocumentStore, UserStore};
