//! FixLog Persistence Layer
//!
//! This crate provides storage and search for the FixLog service back-office:
//! the client directory (거래처), service intake records (접수), back-office
//! users and their roles, the notice board, client groups, reference
//! catalogs, and the activity log.
//!
//! # Features
//!
//! - **Keyword search**: free-text queries such as `상호:에이스 전화:010` are
//!   split into field filters and a general search term
//! - **Role-based access**: every operation runs on behalf of an
//!   [`ActorContext`] and enforces approval, administrator and group rules
//! - **Activity log**: each mutation appends an audit entry atomically
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`actor`] - The signed-in profile and its roles
//! - [`types`] - Domain entities, inputs and pagination
//! - [`search`] - The query-string parser and per-entity search fields
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits and abstractions
//! - [`backends`] - Backend implementations
//!
//! # Search
//!
//! ```
//! use fixlog_persistence::search::QueryParser;
//!
//! let parser = QueryParser::new(["상호", "전화"]).unwrap();
//! let parsed = parser.parse(r#"상호:"에이스 마트" 카드단말기"#);
//!
//! assert_eq!(parsed.get("상호"), Some("에이스 마트"));
//! assert_eq!(parsed.general_search, "카드단말기");
//! ```
//!
//! # Actors
//!
//! ```
//! use fixlog_persistence::actor::{ActorContext, Role};
//!
//! let pending = ActorContext::new("u-2", "field@fixlog.kr", Role::Field, false);
//! assert!(pending.require_approved().is_err());
//!
//! let admin = ActorContext::new("u-1", "admin@fixlog.kr", Role::Admin, true);
//! assert!(admin.require_administrator().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod actor;
pub mod backends;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use actor::{ActorContext, Role};
pub use error::{StorageError, StorageResult};
pub use types::{Page, Pagination};

// Re-export core traits
pub use core::{
    ActivityStorage, Backend, BackendKind, CatalogStorage, ClientStorage, FixlogStorage,
    NoticeStorage, ProfileStorage, RecordStorage,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
