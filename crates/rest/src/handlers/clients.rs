//! Client directory handlers.
//!
//! `GET /clients?q=...` accepts the keyword search syntax, e.g.
//! `상호:"에이스 마트" 전화:010 강남`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::ClientInput;
use serde::Deserialize;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody, PageParams, QueryParams};
use crate::state::AppState;

/// Query parameters for the client list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientListQuery {
    /// Free-text search with optional `keyword:value` tokens.
    pub q: String,
}

/// Lists clients.
///
/// # HTTP Request
///
/// `GET [base]/clients?q=...&_count=...&_offset=...`
pub async fn list_clients_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    QueryParams(query): QueryParams<ClientListQuery>,
    page: PageParams,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    debug!(query = %query.q, "Processing client list request");

    let clients = state
        .storage()
        .list_clients(actor.context(), &query.q, page.pagination())
        .await?;
    Ok(Json(clients).into_response())
}

/// Reads one client.
///
/// # HTTP Request
///
/// `GET [base]/clients/{id}`
pub async fn read_client_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let client = state.storage().get_client(actor.context(), &id).await?;
    Ok(Json(client).into_response())
}

/// Creates a client.
///
/// # HTTP Request
///
/// `POST [base]/clients`
///
/// # Response
///
/// - `201 Created` - The stored client
/// - `400 Bad Request` - Blank name or unknown group
/// - `403 Forbidden` - Group outside the actor's allowed groups
pub async fn create_client_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    JsonBody(input): JsonBody<ClientInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let client = state.storage().create_client(actor.context(), input).await?;
    Ok((StatusCode::CREATED, Json(client)).into_response())
}

/// Replaces a client's editable fields.
///
/// # HTTP Request
///
/// `PUT [base]/clients/{id}`
pub async fn update_client_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ClientInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let client = state
        .storage()
        .update_client(actor.context(), &id, input)
        .await?;
    Ok(Json(client).into_response())
}

/// Deletes a client.
///
/// # HTTP Request
///
/// `DELETE [base]/clients/{id}`
///
/// # Response
///
/// - `204 No Content` - Deleted
/// - `409 Conflict` - Service records still reference the client
pub async fn delete_client_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state.storage().delete_client(actor.context(), &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
