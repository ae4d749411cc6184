//! PostgreSQL implementations of the storage traits.

pub mod document;
pub mod user;

pub use document::DocumentRepository;
pub use user::UserRepository;
