//! Administration handlers: profile management and the activity log.
//!
//! Every operation here requires an approved administrator; the storage
//! layer enforces that and the role guards.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::{LogCategory, ProfileUpdate};
use fixlog_persistence::Role;
use serde::Deserialize;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody, PageParams, QueryParams};
use crate::state::AppState;

/// Query parameters for the profile list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileListQuery {
    /// Matches display name, username, email or role.
    pub search: Option<String>,
}

/// Query parameters for the activity log.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogListQuery {
    /// Category code (`client`, `record`, `system`, ...). Blank means all.
    pub category: String,
}

/// Body of a role change.
#[derive(Debug, Deserialize)]
pub struct RoleChange {
    /// Role code or Korean label.
    pub role: String,
}

/// Body of an allowed-groups change.
#[derive(Debug, Deserialize)]
pub struct AllowedGroups {
    /// Group ids. Empty means every group.
    pub allowed_groups: Vec<String>,
}

/// Lists profiles by role tier.
///
/// # HTTP Request
///
/// `GET [base]/admin/profiles?search=...&_count=...&_offset=...`
pub async fn list_profiles_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    QueryParams(query): QueryParams<ProfileListQuery>,
    page: PageParams,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let profiles = state
        .storage()
        .list_profiles(actor.context(), search, page.pagination())
        .await?;
    Ok(Json(profiles).into_response())
}

/// Reads any profile.
pub async fn read_profile_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let profile = state.storage().get_profile(actor.context(), &id).await?;
    Ok(Json(profile).into_response())
}

/// Edits another user's profile fields.
pub async fn update_profile_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let profile = state
        .storage()
        .update_profile(actor.context(), &id, update)
        .await?;
    Ok(Json(profile).into_response())
}

/// Changes a profile's role.
///
/// # HTTP Request
///
/// `PUT [base]/admin/profiles/{id}/role` with `{ "role": "admin" }`
pub async fn change_role_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(change): JsonBody<RoleChange>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let role = Role::parse(&change.role)?;
    debug!(target_id = %id, role = %role.as_str(), "Processing role change");

    let profile = state
        .storage()
        .change_role(actor.context(), &id, role)
        .await?;
    Ok(Json(profile).into_response())
}

/// Approves a pending profile.
///
/// # HTTP Request
///
/// `PUT [base]/admin/profiles/{id}/approve`
pub async fn approve_profile_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let profile = state
        .storage()
        .approve_profile(actor.context(), &id)
        .await?;
    Ok(Json(profile).into_response())
}

/// Restricts a profile to a set of client groups.
///
/// # HTTP Request
///
/// `PUT [base]/admin/profiles/{id}/groups` with `{ "allowed_groups": [...] }`
pub async fn set_groups_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AllowedGroups>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let profile = state
        .storage()
        .set_allowed_groups(actor.context(), &id, body.allowed_groups)
        .await?;
    Ok(Json(profile).into_response())
}

/// Deletes a profile.
pub async fn delete_profile_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state.storage().delete_profile(actor.context(), &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Reads the activity log, newest first.
///
/// # HTTP Request
///
/// `GET [base]/admin/logs?category=...&_count=...&_offset=...`
pub async fn list_logs_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    QueryParams(query): QueryParams<LogListQuery>,
    page: PageParams,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let category = LogCategory::parse(&query.category)?;
    let logs = state
        .storage()
        .list_activity(actor.context(), category, page.pagination())
        .await?;
    Ok(Json(logs).into_response())
}
