// In-memory implementations for examples and testing
//
// Keeps all events in a Vec, which makes it handy for:
// - Unit tests of the query service and HTTP routes
// - Running the API without a database

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::error_event::ErrorEvent;
use crate::query::{EventFilter, EventQuery, SortDirection};
use crate::traits::ErrorEventStore;

// ============================================================================
// InMemoryErrorEventStore - Stores error events in memory
// ============================================================================

/// In-memory error event store
///
/// Events are kept in insertion order. Sorting is stable, so events with the
/// same created time come back in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryErrorEventStore {
    events: Arc<RwLock<Vec<ErrorEvent>>>,
}

impl InMemoryErrorEventStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a single event
    pub async fn insert(&self, event: ErrorEvent) {
        self.events.write().await.push(event);
    }

    /// Pre-populate with events (useful for testing)
    pub async fn seed(&self, events: impl IntoIterator<Item = ErrorEvent>) {
        self.events.write().await.extend(events);
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Remove all events
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl ErrorEventStore for InMemoryErrorEventStore {
    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<ErrorEvent>> {
        let mut matched: Vec<ErrorEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| query.filter.matches(e))
            .cloned()
            .collect();

        match query.sort.direction {
            SortDirection::Ascending => matched.sort_by(|a, b| a.created_time.cmp(&b.created_time)),
            SortDirection::Descending => {
                matched.sort_by(|a, b| b.created_time.cmp(&a.created_time))
            }
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(query.take).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ErrorEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }
}
