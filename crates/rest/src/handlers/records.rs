//! Service record handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::{NewRecord, RecordStatus, RecordUpdate};
use serde::Deserialize;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody, PageParams, QueryParams};
use crate::state::AppState;

/// Query parameters for the record list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordListQuery {
    /// Free-text search with optional `keyword:value` tokens.
    pub q: String,
    /// Status code or label (`pending`, `대기`, ...).
    pub status: Option<String>,
}

/// Body of a status change.
#[derive(Debug, Deserialize)]
pub struct StatusChange {
    /// Status code or label.
    pub status: String,
}

/// Lists service records, newest reception first.
///
/// # HTTP Request
///
/// `GET [base]/records?q=...&status=...&_count=...&_offset=...`
pub async fn list_records_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    QueryParams(query): QueryParams<RecordListQuery>,
    page: PageParams,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    debug!(query = %query.q, status = ?query.status, "Processing record list request");

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(value) => Some(RecordStatus::parse(value)?),
    };

    let records = state
        .storage()
        .list_records(actor.context(), &query.q, status, page.pagination())
        .await?;
    Ok(Json(records).into_response())
}

/// Reads one record.
///
/// # HTTP Request
///
/// `GET [base]/records/{id}`
pub async fn read_record_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let record = state.storage().get_record(actor.context(), &id).await?;
    Ok(Json(record).into_response())
}

/// Registers a new record in the pending state.
///
/// # HTTP Request
///
/// `POST [base]/records`
pub async fn create_record_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    JsonBody(input): JsonBody<NewRecord>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let record = state.storage().create_record(actor.context(), input).await?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// Edits a record's type and details.
///
/// # HTTP Request
///
/// `PUT [base]/records/{id}`
pub async fn update_record_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<RecordUpdate>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let record = state
        .storage()
        .update_record(actor.context(), &id, update)
        .await?;
    Ok(Json(record).into_response())
}

/// Moves a record to another status.
///
/// # HTTP Request
///
/// `PUT [base]/records/{id}/status` with `{ "status": "completed" }`
pub async fn change_status_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(change): JsonBody<StatusChange>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let status = RecordStatus::parse(&change.status)?;
    let record = state
        .storage()
        .change_status(actor.context(), &id, status)
        .await?;
    Ok(Json(record).into_response())
}

/// Deletes a record.
///
/// # HTTP Request
///
/// `DELETE [base]/records/{id}`
pub async fn delete_record_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state.storage().delete_record(actor.context(), &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
