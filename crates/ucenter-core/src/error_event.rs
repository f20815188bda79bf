// Error event domain types
//
// ErrorEvent is the record a client application reports when it hits a
// runtime error. Page is the response envelope for list queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A client-reported error, keyed by account and creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    /// Opaque identifier assigned when the event was recorded.
    pub id: String,
    /// Account that reported the error.
    pub account_name: String,
    /// When the event was recorded. Sole sort key for listings.
    pub created_time: DateTime<Utc>,
    /// Remaining event fields, passed through unchanged.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ErrorEvent {
    pub fn new(
        id: impl Into<String>,
        account_name: impl Into<String>,
        created_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            account_name: account_name.into(),
            created_time,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// One page of a filtered, ordered result set.
///
/// Built fresh per request; `total` counts every matching record, not just
/// the ones in `raws`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based page number that was requested.
    pub page: u64,
    /// Maximum number of items in a page.
    pub page_size: u64,
    /// Items on this page.
    #[serde(rename = "raws")]
    pub items: Vec<T>,
    /// Number of records matching the filter.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(page: u64, page_size: u64, items: Vec<T>, total: u64) -> Self {
        Self {
            page,
            page_size,
            items,
            total,
        }
    }
}
