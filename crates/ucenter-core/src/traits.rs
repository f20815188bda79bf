// Core traits for pluggable backends
//
// The query service talks to the event collection only through this trait:
// - In-memory implementation for examples and testing
// - Database implementation for production

use async_trait::async_trait;

use crate::error::Result;
use crate::error_event::ErrorEvent;
use crate::query::{EventFilter, EventQuery};

// ============================================================================
// ErrorEventStore - Read access to the error event collection
// ============================================================================

/// Read-only access to stored error events
///
/// Implementations answer each call against the collection's state at call
/// time. Consecutive calls are not required to observe the same snapshot.
#[async_trait]
pub trait ErrorEventStore: Send + Sync {
    /// Count events matching the filter
    async fn count(&self, filter: &EventFilter) -> Result<u64>;

    /// Fetch the filtered, sorted window described by the query
    async fn query(&self, query: &EventQuery) -> Result<Vec<ErrorEvent>>;

    /// Look up a single event by identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<ErrorEvent>>;
}
