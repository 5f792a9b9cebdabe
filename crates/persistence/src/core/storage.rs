//! Storage traits for the back-office domain areas.
//!
//! Each trait covers one area of the back-office. All operations take the
//! [`ActorContext`] of the signed-in profile; implementations enforce the
//! permission rules described on each method and append an activity log
//! entry for every successful mutation.
//!
//! # Example
//!
//! ```ignore
//! use fixlog_persistence::core::ClientStorage;
//! use fixlog_persistence::types::{ClientInput, Pagination};
//!
//! async fn example<S: ClientStorage>(storage: &S, actor: &ActorContext) -> StorageResult<()> {
//!     let client = storage.create_client(actor, ClientInput::named("에이스마트")).await?;
//!     let page = storage
//!         .list_clients(actor, "상호:에이스", Pagination::default())
//!         .await?;
//!     assert_eq!(page.items[0].id, client.id);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use super::backend::Backend;
use crate::actor::{ActorContext, Role};
use crate::error::StorageResult;
use crate::types::{
    ActivityLog, CatalogEntry, CatalogInput, CatalogKind, Client, ClientGroup, ClientInput,
    DashboardStats, LogCategory, NewProfile, NewRecord, Notice, NoticeInput, Page, Pagination,
    Profile, ProfileUpdate, RecordStatus, RecordUpdate, ServiceRecord,
};

/// The client directory (거래처).
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Lists clients matching a free-text search, ordered by name.
    ///
    /// Actors limited to certain client groups only see clients in those
    /// groups.
    async fn list_clients(
        &self,
        actor: &ActorContext,
        query: &str,
        pagination: Pagination,
    ) -> StorageResult<Page<Client>>;

    /// Reads one client.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - if the client does not exist or
    ///   lies outside the actor's groups
    async fn get_client(&self, actor: &ActorContext, id: &str) -> StorageResult<Client>;

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - if the name is blank or the group is unknown
    async fn create_client(&self, actor: &ActorContext, input: ClientInput)
    -> StorageResult<Client>;

    /// Replaces the editable fields of a client.
    async fn update_client(
        &self,
        actor: &ActorContext,
        id: &str,
        input: ClientInput,
    ) -> StorageResult<Client>;

    /// Deletes a client.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(InUse)` - if service records reference it
    async fn delete_client(&self, actor: &ActorContext, id: &str) -> StorageResult<()>;
}

/// Service intake records (접수).
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Lists records matching a free-text search and optional status,
    /// newest reception first.
    async fn list_records(
        &self,
        actor: &ActorContext,
        query: &str,
        status: Option<RecordStatus>,
        pagination: Pagination,
    ) -> StorageResult<Page<ServiceRecord>>;

    /// Reads one record.
    async fn get_record(&self, actor: &ActorContext, id: &str) -> StorageResult<ServiceRecord>;

    /// Registers a new record in the `pending` state.
    ///
    /// The receiver defaults to the actor and the reception time to now.
    async fn create_record(
        &self,
        actor: &ActorContext,
        input: NewRecord,
    ) -> StorageResult<ServiceRecord>;

    /// Edits the type and details of a record.
    async fn update_record(
        &self,
        actor: &ActorContext,
        id: &str,
        update: RecordUpdate,
    ) -> StorageResult<ServiceRecord>;

    /// Moves a record to a new status.
    ///
    /// `completed` stamps the processing time and processor, `processing`
    /// stamps the processor, `pending` clears both.
    async fn change_status(
        &self,
        actor: &ActorContext,
        id: &str,
        status: RecordStatus,
    ) -> StorageResult<ServiceRecord>;

    /// Deletes a record.
    async fn delete_record(&self, actor: &ActorContext, id: &str) -> StorageResult<()>;
}

/// Back-office users (사용자).
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Signs up a new profile.
    ///
    /// New profiles are unapproved `field` users, except the very first
    /// profile, which becomes an approved operator.
    async fn register(&self, input: NewProfile) -> StorageResult<Profile>;

    /// Looks up a profile by id without any permission check.
    ///
    /// Used to resolve the signed-in actor.
    async fn find_profile(&self, id: &str) -> StorageResult<Option<Profile>>;

    /// Reads a profile. Non-administrators may only read their own.
    async fn get_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<Profile>;

    /// Edits the actor's own profile.
    async fn update_own_profile(
        &self,
        actor: &ActorContext,
        update: ProfileUpdate,
    ) -> StorageResult<Profile>;

    /// Lists profiles: operators, then admins, then everyone else, newest
    /// first within each tier. Administrators only.
    ///
    /// `search` matches display name, username, email or role.
    async fn list_profiles(
        &self,
        actor: &ActorContext,
        search: Option<&str>,
        pagination: Pagination,
    ) -> StorageResult<Page<Profile>>;

    /// Edits another profile. Administrators only.
    async fn update_profile(
        &self,
        actor: &ActorContext,
        id: &str,
        update: ProfileUpdate,
    ) -> StorageResult<Profile>;

    /// Changes a profile's role. Administrators only.
    ///
    /// Refused for the actor's own profile and for operators; only an
    /// operator may grant the operator role.
    async fn change_role(&self, actor: &ActorContext, id: &str, role: Role)
    -> StorageResult<Profile>;

    /// Approves a pending profile. Administrators only.
    async fn approve_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<Profile>;

    /// Sets the client groups a profile may see. Administrators only.
    async fn set_allowed_groups(
        &self,
        actor: &ActorContext,
        id: &str,
        groups: Vec<String>,
    ) -> StorageResult<Profile>;

    /// Deletes a profile. Administrators only; refused for oneself and for
    /// operators.
    async fn delete_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<()>;
}

/// The notice board (공지사항).
#[async_trait]
pub trait NoticeStorage: Send + Sync {
    /// Lists notices visible to the actor, pinned first, then newest.
    async fn list_notices(
        &self,
        actor: &ActorContext,
        pagination: Pagination,
    ) -> StorageResult<Page<Notice>>;

    /// Reads a notice visible to the actor.
    async fn get_notice(&self, actor: &ActorContext, id: &str) -> StorageResult<Notice>;

    /// Posts a notice. Administrators only.
    async fn create_notice(&self, actor: &ActorContext, input: NoticeInput)
    -> StorageResult<Notice>;

    /// Edits a notice. Administrators only.
    async fn update_notice(
        &self,
        actor: &ActorContext,
        id: &str,
        input: NoticeInput,
    ) -> StorageResult<Notice>;

    /// Removes a notice. Administrators only.
    async fn delete_notice(&self, actor: &ActorContext, id: &str) -> StorageResult<()>;
}

/// Client groups and the reference catalogs.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Lists client groups by name.
    async fn list_groups(&self, actor: &ActorContext) -> StorageResult<Vec<ClientGroup>>;

    /// Adds a client group. Administrators only.
    async fn create_group(
        &self,
        actor: &ActorContext,
        input: CatalogInput,
    ) -> StorageResult<ClientGroup>;

    /// Removes a client group, detaching its clients. Administrators only.
    async fn delete_group(&self, actor: &ActorContext, id: &str) -> StorageResult<()>;

    /// Lists a catalog in display order.
    async fn list_catalog(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
    ) -> StorageResult<Vec<CatalogEntry>>;

    /// Adds a catalog entry. Administrators only.
    async fn create_catalog_entry(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
        input: CatalogInput,
    ) -> StorageResult<CatalogEntry>;

    /// Removes a catalog entry. Administrators only.
    async fn delete_catalog_entry(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
        id: &str,
    ) -> StorageResult<()>;
}

/// The activity log and dashboard summaries.
#[async_trait]
pub trait ActivityStorage: Send + Sync {
    /// Lists log entries in a category, newest first. Administrators only.
    async fn list_activity(
        &self,
        actor: &ActorContext,
        category: LogCategory,
        pagination: Pagination,
    ) -> StorageResult<Page<ActivityLog>>;

    /// Computes the dashboard counts and recent records.
    async fn dashboard_stats(&self, actor: &ActorContext) -> StorageResult<DashboardStats>;
}

/// Everything the HTTP layer needs from a backend.
pub trait FixlogStorage:
    Backend
    + ClientStorage
    + RecordStorage
    + ProfileStorage
    + NoticeStorage
    + CatalogStorage
    + ActivityStorage
{
}

impl<T> FixlogStorage for T where
    T: Backend
        + ClientStorage
        + RecordStorage
        + ProfileStorage
        + NoticeStorage
        + CatalogStorage
        + ActivityStorage
{
}
