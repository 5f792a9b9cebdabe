//! Core storage traits and abstractions.
//!
//! - [`Backend`] - database driver lifecycle
//! - [`ClientStorage`] - client directory
//! - [`RecordStorage`] - service records and their status
//! - [`ProfileStorage`] - users, roles and approval
//! - [`NoticeStorage`] - notice board
//! - [`CatalogStorage`] - client groups and reference catalogs
//! - [`ActivityStorage`] - activity log and dashboard
//!
//! [`FixlogStorage`] bundles all of them and is implemented automatically for
//! any type that implements each one.

mod backend;
mod storage;

pub use backend::{Backend, BackendKind};
pub use storage::{
    ActivityStorage, CatalogStorage, ClientStorage, FixlogStorage, NoticeStorage, ProfileStorage,
    RecordStorage,
};
