//! HTTP handlers for the FixLog API.
//!
//! Each submodule groups the handlers for one area of the back-office.
//! Handlers resolve the signed-in user through [`CurrentActor`](crate::extractors::CurrentActor)
//! and delegate to the storage layer, which enforces approval and role rules.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod notices;
pub mod records;

pub use admin::{
    approve_profile_handler, change_role_handler, delete_profile_handler, list_logs_handler,
    list_profiles_handler, read_profile_handler, set_groups_handler, update_profile_handler,
};
pub use auth::{me_handler, signup_handler, update_me_handler};
pub use catalog::{
    create_catalog_handler, create_group_handler, delete_catalog_handler, delete_group_handler,
    list_catalog_handler, list_groups_handler,
};
pub use clients::{
    create_client_handler, delete_client_handler, list_clients_handler, read_client_handler,
    update_client_handler,
};
pub use dashboard::dashboard_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use notices::{
    create_notice_handler, delete_notice_handler, list_notices_handler, read_notice_handler,
    update_notice_handler,
};
pub use records::{
    change_status_handler, create_record_handler, delete_record_handler, list_records_handler,
    read_record_handler, update_record_handler,
};
