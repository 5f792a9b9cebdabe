//! Axum extractors for the FixLog API.
//!
//! - [`CurrentActor`] - Resolve the signed-in profile from `X-User-ID`
//! - [`PageParams`] - Extract `_count` / `_offset` pagination parameters
//! - [`JsonBody`] and [`QueryParams`] - `Json` and `Query` with JSON error bodies

mod actor;
mod pagination;
mod params;

pub use actor::{CurrentActor, X_USER_ID};
pub use pagination::PageParams;
pub use params::{JsonBody, QueryParams};
