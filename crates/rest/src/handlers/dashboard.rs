//! Dashboard handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;

use crate::error::RestResult;
use crate::extractors::CurrentActor;
use crate::state::AppState;

/// Returns the record counts and the most recent records.
///
/// # HTTP Request
///
/// `GET [base]/dashboard`
pub async fn dashboard_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let stats = state.storage().dashboard_stats(actor.context()).await?;
    Ok(Json(stats).into_response())
}
