//! Body and query extractors that reject with [`RestError`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::RestError;

/// `axum::Json`, rejecting with the API's JSON error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RestError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query`, rejecting with the API's JSON error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(RestError))]
pub struct QueryParams<T>(pub T);
