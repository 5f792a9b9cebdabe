//! Route configuration for the FixLog API.
//!
//! Maps HTTP paths to handlers.

pub mod api_routes;

pub use api_routes::{create_minimal_routes, create_routes};
