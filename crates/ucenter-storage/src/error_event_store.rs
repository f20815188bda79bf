// Database-backed ErrorEventStore implementation
//
// This module implements the core ErrorEventStore trait on top of the
// error_events table.

use async_trait::async_trait;
use ucenter_core::{
    traits::ErrorEventStore, Error, ErrorEvent, EventFilter, EventQuery, Result,
};

use crate::repositories::Database;

// ============================================================================
// DbErrorEventStore - Reads error events from the database
// ============================================================================

/// Database-backed error event store
#[derive(Clone)]
pub struct DbErrorEventStore {
    db: Database,
}

impl DbErrorEventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ErrorEventStore for DbErrorEventStore {
    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let count = self
            .db
            .count_error_events(filter)
            .await
            .map_err(|e| Error::store(e.to_string()))?;

        u64::try_from(count).map_err(|e| Error::store(e.to_string()))
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<ErrorEvent>> {
        let rows = self
            .db
            .list_error_events(query)
            .await
            .map_err(|e| Error::store(e.to_string()))?;

        Ok(rows.into_iter().map(ErrorEvent::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ErrorEvent>> {
        let row = self
            .db
            .get_error_event(id)
            .await
            .map_err(|e| Error::store(e.to_string()))?;

        Ok(row.map(ErrorEvent::from))
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed error event store
pub fn create_db_error_event_store(db: Database) -> DbErrorEventStore {
    DbErrorEventStore::new(db)
}
