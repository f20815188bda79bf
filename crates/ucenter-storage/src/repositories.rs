// Repository layer for database operations
//
// Reads only. The error_events table is written by the event ingestion side:
//
//   error_events(id TEXT PRIMARY KEY, account_name TEXT NOT NULL,
//                created_time TIMESTAMPTZ NOT NULL, payload JSONB)

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use ucenter_core::{EventFilter, EventQuery, SortDirection};

use crate::models::*;

const ERROR_EVENT_COLUMNS: &str = "id, account_name, created_time, payload";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection with a bounded pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    // ============================================
    // Error events
    // ============================================

    pub async fn count_error_events(&self, filter: &EventFilter) -> Result<i64> {
        if matches_nothing(filter) {
            return Ok(0);
        }

        let mut builder = count_query(filter);
        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn list_error_events(&self, query: &EventQuery) -> Result<Vec<ErrorEventRow>> {
        if matches_nothing(&query.filter) {
            return Ok(Vec::new());
        }

        let mut builder = page_query(query)?;
        tracing::trace!(sql = builder.sql(), "Listing error events");

        let rows = builder
            .build_query_as::<ErrorEventRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn get_error_event(&self, id: &str) -> Result<Option<ErrorEventRow>> {
        let row = sqlx::query_as::<_, ErrorEventRow>(
            r#"
            SELECT id, account_name, created_time, payload
            FROM error_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// ============================================
// Query building
// ============================================

/// TEXT columns never hold NUL, and Postgres rejects it in bound text,
/// so a keyword containing one cannot match any row.
fn matches_nothing(filter: &EventFilter) -> bool {
    filter
        .account_name_contains
        .as_deref()
        .is_some_and(|keyword| keyword.contains('\0'))
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    // strpos treats the keyword literally, unlike LIKE with % and _
    if let Some(keyword) = &filter.account_name_contains {
        builder
            .push(" WHERE strpos(account_name, ")
            .push_bind(keyword.clone())
            .push(") > 0");
    }
}

fn count_query(filter: &EventFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM error_events");
    push_filter(&mut builder, filter);
    builder
}

fn page_query(query: &EventQuery) -> Result<QueryBuilder<'static, Postgres>> {
    let take = i64::try_from(query.take)?;
    let skip = i64::try_from(query.skip)?;

    let mut builder = QueryBuilder::new("SELECT ");
    builder
        .push(ERROR_EVENT_COLUMNS)
        .push(" FROM error_events");
    push_filter(&mut builder, &query.filter);

    let direction = match query.sort.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    builder
        .push(" ORDER BY created_time ")
        .push(direction)
        .push(" LIMIT ")
        .push_bind(take)
        .push(" OFFSET ")
        .push_bind(skip);

    Ok(builder)
}
