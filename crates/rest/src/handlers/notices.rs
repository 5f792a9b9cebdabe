//! Notice board handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::NoticeInput;

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody, PageParams};
use crate::state::AppState;

/// Lists the notices visible to the actor, pinned first.
///
/// # HTTP Request
///
/// `GET [base]/notices?_count=...&_offset=...`
pub async fn list_notices_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    page: PageParams,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let notices = state
        .storage()
        .list_notices(actor.context(), page.pagination())
        .await?;
    Ok(Json(notices).into_response())
}

/// Reads one notice. Notices outside the actor's audience are reported as
/// missing.
pub async fn read_notice_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let notice = state.storage().get_notice(actor.context(), &id).await?;
    Ok(Json(notice).into_response())
}

/// Posts a notice.
///
/// # HTTP Request
///
/// `POST [base]/notices`
pub async fn create_notice_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    JsonBody(input): JsonBody<NoticeInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let notice = state.storage().create_notice(actor.context(), input).await?;
    Ok((StatusCode::CREATED, Json(notice)).into_response())
}

/// Edits a notice.
pub async fn update_notice_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<NoticeInput>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let notice = state
        .storage()
        .update_notice(actor.context(), &id, input)
        .await?;
    Ok(Json(notice).into_response())
}

/// Removes a notice.
pub async fn delete_notice_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    state.storage().delete_notice(actor.context(), &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
