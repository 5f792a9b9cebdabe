//! # fixlog-rest - HTTP API for the FixLog back-office
//!
//! This crate exposes the FixLog storage layer over HTTP with axum. It covers
//! the client directory, service records, the notice board, client groups and
//! reference catalogs, user administration, the activity log and the
//! dashboard.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fixlog_rest::{create_app, ServerConfig};
//! use fixlog_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("fixlog.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app(backend);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Identity
//!
//! Authentication happens upstream. Each request names the signed-in user in
//! the `X-User-ID` header; the server looks the profile up and applies the
//! approval and role rules from there. Only the health endpoints and
//! `POST /auth/signup` work without it.
//!
//! ## Searching
//!
//! `GET /clients?q=...` and `GET /records?q=...` take the keyword syntax:
//!
//! ```text
//! 상호:"에이스 마트" 전화:010 강남
//! 상태:완료 접수일:2024-03
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned as `{ "error": { "code": ..., "message": ... } }`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | bad_request | Invalid input or query |
//! | 401 | unauthorized | Missing or unknown `X-User-ID` |
//! | 403 | forbidden | Not approved, not an administrator, or guarded |
//! | 404 | not_found | Entity missing or outside the actor's scope |
//! | 409 | conflict | Duplicate name or entity still referenced |
//! | 422 | unprocessable | Body did not match the expected shape |
//! | 500 | internal | Storage failure |
//!
//! ## Architecture
//!
//! - [`error`] - Error type and status mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`extractors`] - Signed-in user, pagination and body extractors
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use extractors::X_USER_ID;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use fixlog_persistence::core::FixlogStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: FixlogStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up every route plus the tracing, timeout, body limit, CORS and
/// request ID layers.
///
/// # Example
///
/// ```rust,ignore
/// use fixlog_rest::{create_app_with_config, ServerConfig};
/// use fixlog_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: FixlogStorage + Send + Sync + 'static,
{
    info!("Creating FixLog API server with backend: {}", storage.name());

    let state = AppState::new(Arc::new(storage), config.clone());

    let router = routing::create_routes(state).layer(DefaultBodyLimit::max(config.max_body_size));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    // SetRequestId runs first so the propagated header is always present.
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fixlog={level},fixlog_rest={level},fixlog_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
