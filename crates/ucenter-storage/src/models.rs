// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use ucenter_core::ErrorEvent;

// ============================================
// Error event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ErrorEventRow {
    pub id: String,
    pub account_name: String,
    pub created_time: DateTime<Utc>,
    pub payload: Option<sqlx::types::JsonValue>,
}

impl From<ErrorEventRow> for ErrorEvent {
    fn from(row: ErrorEventRow) -> Self {
        ErrorEvent {
            id: row.id,
            account_name: row.account_name,
            created_time: row.created_time,
            payload: row.payload.unwrap_or(serde_json::Value::Null),
        }
    }
}
