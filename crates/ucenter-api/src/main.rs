// UCenter error events API server
// Decision: Read-only endpoints; error events are written by the ingestion side
// Decision: Shutdown cancels in-flight store queries through a shared CancellationToken

mod common;
mod config;
mod error_events;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ucenter_core::{ErrorEvent, ErrorEventStore, InMemoryErrorEventStore, Page};
use ucenter_storage::{create_db_error_event_store, Database};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{ApiConfig, StoreMode};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: String,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.clone(),
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    store: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        error_events::list_error_events,
        error_events::get_error_event,
    ),
    components(
        schemas(
            ErrorEvent,
            Page<ErrorEvent>,
        )
    ),
    tags(
        (name = "error-events", description = "Client-reported error events (read-only)")
    ),
    info(
        title = "UCenter Error Events API",
        version = "0.1.0",
        description = "API for browsing client-reported error events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ucenter_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ucenter-api starting...");

    let config = ApiConfig::from_env();
    tracing::info!(
        store = ?config.store_mode,
        bind_addr = %config.bind_addr,
        "Configuration loaded"
    );

    let store = create_store(&config).await?;

    // Cancelled on shutdown; every request query runs under a child token
    let shutdown = CancellationToken::new();

    let error_events_state = error_events::AppState::new(store, shutdown.clone());
    let health_state = HealthState {
        store: format!("{:?}", config.store_mode),
    };

    let cors_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let api_routes = error_events::routes(error_events_state);

    // Build main router with health (not prefixed) and prefixed API routes
    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix));

    // Add Swagger UI
    let app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", config.bind_addr);

    tokio::spawn(wait_for_shutdown(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Server error")?;

    tracing::info!("ucenter-api stopped");

    Ok(())
}

async fn create_store(config: &ApiConfig) -> Result<Arc<dyn ErrorEventStore>> {
    match config.store_mode {
        StoreMode::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL environment variable required")?;
            let db = Database::connect(database_url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "Connected to database"
            );
            Ok(Arc::new(create_db_error_event_store(db)))
        }
        StoreMode::Memory => {
            tracing::warn!("Using in-memory error event store; no events will be persisted");
            Ok(Arc::new(InMemoryErrorEventStore::new()))
        }
    }
}

/// Cancel the shutdown token on Ctrl+C
async fn wait_for_shutdown(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
