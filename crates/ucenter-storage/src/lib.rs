// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbErrorEventStore: implements ErrorEventStore for error event reads

pub mod error_event_store;
pub mod models;
pub mod repositories;

pub use error_event_store::{create_db_error_event_store, DbErrorEventStore};
pub use models::*;
pub use repositories::*;
