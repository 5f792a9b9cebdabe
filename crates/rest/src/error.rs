//! Error types for the FixLog HTTP API.
//!
//! This module defines the error type returned by every handler, with
//! automatic conversion to a JSON error body.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are mapped to HTTP status codes:
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | NotFound | 404 | not_found |
//! | AlreadyExists, InUse | 409 | conflict |
//! | ValidationError | 400 | bad_request |
//! | UnknownActor | 401 | unauthorized |
//! | NotApproved, AdministratorRequired, Forbidden | 403 | forbidden |
//! | SearchError, BackendError | 500 | internal |
//!
//! Every error is rendered as `{ "error": { "code": ..., "message": ... } }`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixlog_persistence::error::{
    BackendError, PermissionError, ResourceError, SearchError, StorageError, ValidationError,
};
use std::fmt;
use tracing::error;

/// The primary error type for HTTP API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed request or invalid input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// No usable user identity was presented (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The signed-in user may not do this (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Entity not found (HTTP 404).
    NotFound {
        /// The entity kind (e.g., "client").
        kind: String,
        /// The entity ID.
        id: String,
    },

    /// Conflicts with existing data (HTTP 409).
    Conflict {
        /// Message describing the conflict.
        message: String,
    },

    /// Well-formed body with unusable content (HTTP 422).
    UnprocessableEntity {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "bad_request",
            RestError::Unauthorized { .. } => "unauthorized",
            RestError::Forbidden { .. } => "forbidden",
            RestError::NotFound { .. } => "not_found",
            RestError::Conflict { .. } => "conflict",
            RestError::UnprocessableEntity { .. } => "unprocessable",
            RestError::InternalError { .. } => "internal",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { kind, id } => write!(f, "Not found: {} {}", kind, id),
            RestError::Conflict { message } => write!(f, "Conflict: {}", message),
            RestError::UnprocessableEntity { message } => {
                write!(f, "Unprocessable entity: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::Forbidden { message }
            | RestError::Conflict { message }
            | RestError::UnprocessableEntity { message }
            | RestError::InternalError { message } => message.clone(),
            RestError::NotFound { kind, id } => format!("{} {} not found", kind, id),
        };

        if status.is_server_error() {
            error!(error = %message, "Request failed");
        }

        (status, Json(error_body(self.code(), &message))).into_response()
    }
}

/// Builds the JSON error body.
pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Permission(e) => e.into(),
            StorageError::Search(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { kind, id } => RestError::NotFound { kind, id },
            ResourceError::AlreadyExists { .. } | ResourceError::InUse { .. } => {
                RestError::Conflict {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<PermissionError> for RestError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::UnknownActor { .. } => RestError::Unauthorized {
                message: err.to_string(),
            },
            PermissionError::NotApproved { .. }
            | PermissionError::AdministratorRequired { .. }
            | PermissionError::Forbidden { .. } => RestError::Forbidden {
                message: err.to_string(),
            },
        }
    }
}

impl From<SearchError> for RestError {
    fn from(err: SearchError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => RestError::UnprocessableEntity {
                message: e.body_text(),
            },
            other => RestError::BadRequest {
                message: other.body_text(),
            },
        }
    }
}

impl From<QueryRejection> for RestError {
    fn from(rejection: QueryRejection) -> Self {
        RestError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Result type alias for HTTP API operations.
pub type RestResult<T> = Result<T, RestError>;
