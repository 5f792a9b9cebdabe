//! Sign-up and own-profile handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::{NewProfile, ProfileUpdate};
use tracing::{debug, info};

use crate::error::RestResult;
use crate::extractors::{CurrentActor, JsonBody};
use crate::state::AppState;

/// Registers a new profile.
///
/// The very first profile becomes an approved operator; everyone after
/// that waits for an administrator's approval.
///
/// # HTTP Request
///
/// `POST [base]/auth/signup`
///
/// # Response
///
/// - `201 Created` - The new profile
/// - `400 Bad Request` - Missing or malformed email
/// - `409 Conflict` - Email already registered
pub async fn signup_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(input): JsonBody<NewProfile>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    debug!(email = %input.email, "Processing sign-up request");

    let profile = state.storage().register(input).await?;

    info!(profile_id = %profile.id, "Signed up");
    Ok((StatusCode::CREATED, Json(profile)).into_response())
}

/// Returns the signed-in profile. Works before approval.
///
/// # HTTP Request
///
/// `GET [base]/me`
pub async fn me_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let profile = state
        .storage()
        .get_profile(actor.context(), actor.user_id())
        .await?;
    Ok(Json(profile).into_response())
}

/// Edits the signed-in profile.
///
/// # HTTP Request
///
/// `PUT [base]/me`
pub async fn update_me_handler<S>(
    State(state): State<AppState<S>>,
    actor: CurrentActor,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> RestResult<Response>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    debug!(user_id = %actor.user_id(), "Processing own profile update");

    let profile = state
        .storage()
        .update_own_profile(actor.context(), update)
        .await?;
    Ok(Json(profile).into_response())
}
