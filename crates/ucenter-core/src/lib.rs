// Error Event Query Core
//
// This crate provides a DB-agnostic implementation of filtered, ordered,
// paginated reads over the error event collection.
//
// Key design decisions:
// - Uses the ErrorEventStore trait for pluggable backends
// - Queries are built from typed steps (filter, sort, skip, take)
// - Every store call honours a CancellationToken
// - Domain entity types (ErrorEvent, Page) are defined here

// Domain entity types
pub mod error_event;

pub mod error;
pub mod query;
pub mod service;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use error::{Error, Result};
pub use error_event::{ErrorEvent, Page};
pub use memory::InMemoryErrorEventStore;
pub use query::{
    EventFilter, EventQuery, EventSort, EventSortField, ListEventsRequest, SortDirection,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
pub use service::EventQueryService;
pub use traits::ErrorEventStore;

// Cancellation token type used by the service API
pub use tokio_util::sync::CancellationToken;
