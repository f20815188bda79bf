// Error event HTTP routes (read-only)
//
// Both routes derive a per-request cancellation token from the server's
// shutdown token. The drop guard cancels it when the handler future is
// dropped, e.g. on client disconnect.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use ucenter_core::{
    Error, ErrorEvent, ErrorEventStore, EventQueryService, ListEventsRequest, Page, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE,
};
use utoipa::IntoParams;

use crate::common::empty_string_as_none;

/// App state for error event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventQueryService>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Arc<dyn ErrorEventStore>, shutdown: CancellationToken) -> Self {
        Self {
            service: Arc::new(EventQueryService::new(store)),
            shutdown,
        }
    }
}

/// Create error event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/errorEvents", get(list_error_events))
        .route("/api/errorEvents/:id", get(get_error_event))
        .with_state(state)
}

/// Query parameters for the error event list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ErrorEventsQuery {
    /// Only return events whose account name contains this text (case-sensitive).
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(example = "bob")]
    pub keyword: Option<String>,
    /// Accepted for compatibility. Results are always sorted by created time, newest first.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub orderby: Option<String>,
    /// 1-based page number. Defaults to 1.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(example = 1)]
    pub page: Option<i64>,
    /// Page size. Defaults to 1000.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(example = 1000)]
    pub count: Option<i64>,
}

impl ErrorEventsQuery {
    fn into_request(self) -> ListEventsRequest {
        ListEventsRequest {
            keyword: self.keyword,
            page: self.page.unwrap_or(DEFAULT_PAGE),
            page_size: self.count.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// GET /api/errorEvents - List error events, newest first
#[utoipa::path(
    get,
    path = "/api/errorEvents",
    params(ErrorEventsQuery),
    responses(
        (status = 200, description = "Page of error events", body = Page<ErrorEvent>),
        (status = 400, description = "Invalid page or count"),
        (status = 500, description = "Internal server error")
    ),
    tag = "error-events"
)]
pub async fn list_error_events(
    State(state): State<AppState>,
    Query(query): Query<ErrorEventsQuery>,
) -> Result<Json<Page<ErrorEvent>>, StatusCode> {
    if let Some(orderby) = query.orderby.as_deref() {
        tracing::debug!(orderby, "orderby is not supported, sorting by created time");
    }

    let request = query.into_request();
    let token = state.shutdown.child_token();
    let _guard = token.clone().drop_guard();

    let page = state
        .service
        .list(&request, &token)
        .await
        .map_err(|e| error_status("Failed to list error events", e))?;

    Ok(Json(page))
}

/// GET /api/errorEvents/{id} - Get error event by ID
#[utoipa::path(
    get,
    path = "/api/errorEvents/{id}",
    params(
        ("id" = String, Path, description = "Error event ID")
    ),
    responses(
        (status = 200, description = "Error event found", body = ErrorEvent),
        (status = 404, description = "Error event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "error-events"
)]
pub async fn get_error_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ErrorEvent>, StatusCode> {
    let token = state.shutdown.child_token();
    let _guard = token.clone().drop_guard();

    let event = state
        .service
        .get(&id, &token)
        .await
        .map_err(|e| error_status("Failed to get error event", e))?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(event))
}

fn error_status(context: &str, err: Error) -> StatusCode {
    match err {
        Error::InvalidPagination(msg) => {
            tracing::debug!("{}: {}", context, msg);
            StatusCode::BAD_REQUEST
        }
        Error::Cancelled => {
            tracing::info!("{}: cancelled", context);
            StatusCode::SERVICE_UNAVAILABLE
        }
        e @ Error::Store(_) => {
            tracing::error!("{}: {}", context, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
