//! Per-user mind-map/kanban document.

pub mod default;
pub mod model;

pub use default::default_payload;
pub use model::{CURRENT_SCHEMA_VERSION, DocumentRecord, INITIAL_VERSION, WriteOutcome};
