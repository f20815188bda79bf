// API configuration loaded from environment variables.
// Decision: Default to the Postgres store; "memory" runs without a database for local development

/// Backend that serves error event reads
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Postgres via DATABASE_URL
    #[default]
    Postgres,
    /// Empty in-memory store (local development)
    Memory,
}

impl StoreMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" => StoreMode::Memory,
            _ => StoreMode::Postgres,
        }
    }
}

/// Complete API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Which store backs the error event routes
    pub store_mode: StoreMode,
    /// Postgres connection string (required in Postgres mode)
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Address the HTTP server listens on
    pub bind_addr: String,
    /// Prefix applied to API routes, e.g. "/manager" gives /manager/api/errorEvents
    pub api_prefix: String,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            store_mode: StoreMode::Postgres,
            database_url: None,
            database_max_connections: 10,
            bind_addr: "0.0.0.0:9000".to_string(),
            api_prefix: String::new(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store_mode = lookup("EVENT_STORE")
            .map(|s| StoreMode::from_str(&s))
            .unwrap_or_default();

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.database_max_connections);

        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_addr);

        let api_prefix = lookup("API_PREFIX").unwrap_or_default();

        // Example: CORS_ALLOWED_ORIGINS="https://admin.example.com,https://ops.example.com"
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            store_mode,
            database_url,
            database_max_connections,
            bind_addr,
            api_prefix,
            cors_allowed_origins,
        }
    }
}
