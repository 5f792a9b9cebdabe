//! Signed-in actor extractor.
//!
//! Resolves the `X-User-ID` header to a stored profile and builds the
//! [`ActorContext`] every storage operation runs under.

use axum::extract::FromRequestParts;
use fixlog_persistence::actor::ActorContext;
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::error::PermissionError;
use fixlog_persistence::types::Profile;
use http::{HeaderMap, HeaderName, request::Parts};
use tracing::debug;

use crate::error::RestError;
use crate::state::AppState;

/// Header carrying the signed-in profile id.
pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// Axum extractor for the signed-in profile.
///
/// Rejects with 401 when the header is missing or names no profile.
/// Approval and role checks are left to the storage operations, so an
/// unapproved profile can still read itself.
///
/// # Example
///
/// ```rust,ignore
/// use fixlog_rest::extractors::CurrentActor;
///
/// async fn handler(actor: CurrentActor) {
///     println!("Signed in as {}", actor.context().email());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentActor {
    context: ActorContext,
    profile: Profile,
}

impl CurrentActor {
    /// Creates an actor for a stored profile.
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            context: ActorContext::from_profile(&profile),
            profile,
        }
    }

    /// Returns the actor context.
    pub fn context(&self) -> &ActorContext {
        &self.context
    }

    /// Returns the stored profile.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Returns the profile id.
    pub fn user_id(&self) -> &str {
        self.context.user_id()
    }
}

fn user_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(&X_USER_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl<S> FromRequestParts<AppState<S>> for CurrentActor
where
    S: FixlogStorage + Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from_headers(&parts.headers).ok_or_else(|| {
            RestError::Unauthorized {
                message: "missing X-User-ID header".to_string(),
            }
        })?;

        let profile = state
            .storage()
            .find_profile(&user_id)
            .await?
            .ok_or_else(|| PermissionError::UnknownActor {
                user_id: user_id.clone(),
            })?;

        debug!(
            user_id = %profile.id,
            role = %profile.role,
            approved = profile.is_approved,
            "Resolved actor"
        );
        Ok(CurrentActor::from_profile(profile))
    }
}
