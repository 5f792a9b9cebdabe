//! Client group and reference catalog handlers.
//!
//! The three catalogs (service types, VAN companies, equipment types) share
//! one set of handlers; the router attaches the [`CatalogKind`] as a request
//! extension.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::{CatalogInput, CatalogKind};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody};
use crate::state::AppState;

/// Lists client groups visible to the actor.
///
/// # HTTP Request
///
/// `GET [base]/groups`
pub async fn list_groups_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let groups = state.storage().list_groups(actor.context()).await?;
    Ok(Json(groups).into_response())
}

/// Adds a client group.
///
/// # HTTP Request
///
/// `POST [base]/groups` with `{ "name": "..." }`
pub async fn create_group_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    JsonBody(input): JsonBody<CatalogInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let group = state.storage().create_group(actor.context(), input).await?;
    Ok((StatusCode::CREATED, Json(group)).into_response())
}

/// Removes a client group. Its clients become ungrouped.
pub async fn delete_group_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state.storage().delete_group(actor.context(), &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Lists a catalog in display order.
///
/// # HTTP Request
///
/// `GET [base]/service-types`, `GET [base]/van-companies`,
/// `GET [base]/equipment-types`
pub async fn list_catalog_handler<S>(
    State(state): State<AppState<S>>,
    Extension(kind): Extension<CatalogKind>,
    actor: CurrentActor,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    debug!(catalog = %kind, "Processing catalog list request");

    let entries = state.storage().list_catalog(actor.context(), kind).await?;
    Ok(Json(entries).into_response())
}

/// Adds a catalog entry.
///
/// # Response
///
/// - `201 Created` - The stored entry
/// - `409 Conflict` - An entry with that name already exists
pub async fn create_catalog_handler<S>(
    State(state): State<AppState<S>>,
    Extension(kind): Extension<CatalogKind>,
    actor: CurrentActor,
    JsonBody(input): JsonBody<CatalogInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let entry = state
        .storage()
        .create_catalog_entry(actor.context(), kind, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

/// Removes a catalog entry.
pub async fn delete_catalog_handler<S>(
    State(state): State<AppState<S>>,
    Extension(kind): Extension<CatalogKind>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state
        .storage()
        .delete_catalog_entry(actor.context(), kind, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
