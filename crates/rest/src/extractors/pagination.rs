//! Pagination extractor.
//!
//! Extracts `_count` and `_offset` from the query string, applying the
//! configured default and maximum page sizes.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::Pagination;
use serde::Deserialize;

use crate::error::RestError;
use crate::state::AppState;

/// Axum extractor for pagination parameters.
///
/// # Example
///
/// ```rust,ignore
/// use fixlog_rest::extractors::PageParams;
///
/// async fn list_handler(page: PageParams) {
///     let pagination = page.pagination();
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageParams(Pagination);

/// Query parameters for pagination.
#[derive(Debug, Deserialize)]
struct PaginationQuery {
    #[serde(rename = "_count")]
    count: Option<u32>,
    #[serde(rename = "_offset")]
    offset: Option<u32>,
}

impl PageParams {
    /// Returns the requested window.
    pub fn pagination(&self) -> Pagination {
        self.0
    }
}

fn resolve(query: &PaginationQuery, default_count: u32, max_count: u32) -> Pagination {
    let count = query.count.unwrap_or(default_count).min(max_count);
    Pagination::new(count, query.offset.unwrap_or(0))
}

impl<S> FromRequestParts<AppState<S>> for PageParams
where
    S: FixlogStorage + Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| RestError::BadRequest {
                message: "Invalid pagination parameters".to_string(),
            })?;

        Ok(PageParams(resolve(
            &query,
            state.default_page_size(),
            state.max_page_size(),
        )))
    }
}
