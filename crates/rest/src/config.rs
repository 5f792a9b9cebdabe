//! Server configuration for the FixLog HTTP API.
//!
//! This module provides configuration types for the server, supporting
//! command line flags with environment variable fallbacks.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FIXLOG_PORT` | 8080 | Server port |
//! | `FIXLOG_HOST` | 127.0.0.1 | Host to bind |
//! | `FIXLOG_LOG_LEVEL` | info | Log level |
//! | `FIXLOG_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `FIXLOG_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `FIXLOG_ENABLE_CORS` | true | Enable CORS |
//! | `FIXLOG_CORS_ORIGINS` | * | Allowed origins |
//! | `FIXLOG_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `FIXLOG_CORS_HEADERS` | Content-Type,Accept,X-User-ID | Allowed headers |
//! | `FIXLOG_DATABASE_URL` | fixlog.db | SQLite file, or `:memory:` |
//! | `FIXLOG_ENABLE_REQUEST_ID` | true | Attach `x-request-id` to requests |
//! | `FIXLOG_DEFAULT_PAGE_SIZE` | 20 | Default list page size |
//! | `FIXLOG_MAX_PAGE_SIZE` | 200 | Largest page a client may ask for |
//!
//! # Example
//!
//! ```rust
//! use fixlog_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;

/// Server configuration for the FixLog HTTP API.
#[derive(Debug, Clone, Parser)]
#[command(name = "fixlog")]
#[command(about = "FixLog service back-office server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "FIXLOG_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "FIXLOG_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FIXLOG_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "FIXLOG_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "FIXLOG_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "FIXLOG_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "FIXLOG_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "FIXLOG_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "FIXLOG_CORS_HEADERS",
        default_value = "Content-Type,Accept,X-User-ID"
    )]
    pub cors_headers: String,

    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "FIXLOG_DATABASE_URL", default_value = "fixlog.db")]
    pub database_url: String,

    /// Enable request ID tracking.
    #[arg(long, env = "FIXLOG_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Default page size for list endpoints.
    #[arg(long, env = "FIXLOG_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Maximum page size for list endpoints.
    #[arg(long, env = "FIXLOG_MAX_PAGE_SIZE", default_value = "200")]
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept,X-User-ID".to_string(),
            database_url: "fixlog.db".to_string(),
            enable_request_id: true,
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Falls back to the defaults when parsing fails.
    pub fn from_env() -> Self {
        Self::try_parse_from(["fixlog"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the database lives in memory.
    pub fn is_memory_database(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, an in-memory database, and disables
    /// features that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            database_url: ":memory:".to_string(),
            enable_request_id: false,
            default_page_size: 10,
            max_page_size: 50,
        }
    }
}
