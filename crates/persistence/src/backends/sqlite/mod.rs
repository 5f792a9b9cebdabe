//! SQLite backend implementation.
//!
//! This module provides the SQLite implementation of every storage trait.
//! It supports both in-memory databases (great for testing) and file-based
//! databases (for development and small deployments).
//!
//! # Features
//!
//! - In-memory and file-based modes
//! - Keyword search over clients and service records
//! - Client-group scoping for restricted profiles
//! - An activity log entry written in the same transaction as each mutation
//!
//! # Example
//!
//! ```no_run
//! use fixlog_persistence::backends::sqlite::SqliteBackend;
//! use fixlog_persistence::core::ProfileStorage;
//! use fixlog_persistence::types::NewProfile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! // The first profile becomes the approved operator.
//! let operator = backend.register(NewProfile::new("ops@fixlog.kr")).await?;
//! assert!(operator.is_approved);
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE clients (
//!     id TEXT PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     ...
//!     group_id TEXT REFERENCES client_groups(id) ON DELETE SET NULL
//! );
//!
//! CREATE TABLE service_records (
//!     id TEXT PRIMARY KEY,
//!     client_id TEXT NOT NULL REFERENCES clients(id),
//!     type TEXT NOT NULL,
//!     status TEXT NOT NULL DEFAULT 'pending',
//!     ...
//! );
//!
//! -- plus profiles, notices, client_groups, activity_logs and the
//! -- service_types / van_companies / equipment_types catalogs
//! ```

mod activity;
mod backend;
mod catalog;
mod clients;
mod notices;
mod profiles;
mod query_builder;
mod records;
mod rows;
mod schema;

pub use backend::{SqliteBackend, SqliteBackendConfig};
