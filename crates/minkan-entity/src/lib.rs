//! # minkan-entity
//!
//! Domain entity models for the Mind-Kanban backend. Database rows derive
//! `sqlx::FromRow`; the document payload itself stays opaque JSON and is only
//! modelled here to build the default state handed to new accounts.

pub mod document;
pub mod user;

pub use document::{DocumentRecord, WriteOutcome};
pub use user::{NewUser, User};
