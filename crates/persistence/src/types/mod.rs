//! Domain types for the persistence layer.
//!
//! This module contains the entities stored by the back-office and the input
//! types accepted when creating or editing them:
//!
//! - [`Client`], [`ClientGroup`] - the client directory
//! - [`ServiceRecord`], [`RecordStatus`] - service intake and lifecycle
//! - [`Profile`] - back-office users
//! - [`Notice`] - notice board
//! - [`ActivityLog`] - audit trail of mutations
//! - [`CatalogEntry`] - reference lists (service types, VAN companies, equipment)
//! - [`Pagination`], [`Page`] - offset pagination

mod activity;
mod catalog;
mod client;
mod dashboard;
mod notice;
mod pagination;
mod profile;
mod record;

pub use activity::{ActivityAction, ActivityLog, LogCategory, NewActivity, TargetType};
pub use catalog::{CatalogEntry, CatalogInput, CatalogKind};
pub use client::{Client, ClientGroup, ClientInput};
pub use dashboard::{DashboardStats, RECENT_RECORD_LIMIT};
pub use notice::{Notice, NoticeInput};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, Pagination};
pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use record::{NewRecord, RecordStatus, RecordUpdate, ServiceRecord};
