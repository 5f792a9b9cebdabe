//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates resource state errors, validation errors,
//! permission errors, search errors and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Actor permission errors
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Search setup errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to entity state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested entity was not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// An entity with the same unique value already exists.
    #[error("{kind} already exists: {value}")]
    AlreadyExists { kind: String, value: String },

    /// The entity is still referenced and cannot be removed.
    #[error("{kind} {id} is still referenced by {count} {dependent}")]
    InUse {
        kind: String,
        id: String,
        dependent: String,
        count: usize,
    },
}

/// Errors related to input validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A field holds a value that is not acceptable.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The record status is not one of the known states.
    #[error("unknown record status: {value}")]
    UnknownStatus { value: String },

    /// The role is not one of the known roles.
    #[error("unknown role: {value}")]
    UnknownRole { value: String },
}

/// Errors related to what the acting profile may do.
#[derive(Error, Debug)]
pub enum PermissionError {
    /// No profile matches the presented user id.
    #[error("unknown user: {user_id}")]
    UnknownActor { user_id: String },

    /// The profile exists but has not been approved yet.
    #[error("user {user_id} is awaiting approval")]
    NotApproved { user_id: String },

    /// The operation requires an administrator (operator or admin).
    #[error("user {user_id} is not an administrator")]
    AdministratorRequired { user_id: String },

    /// The operation is refused for this actor.
    #[error("operation not permitted: {message}")]
    Forbidden { message: String },
}

/// Errors raised while preparing search machinery.
///
/// Parsing a search string never fails; these only occur when a parser is
/// compiled from a keyword whitelist.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The keyword whitelist is empty.
    #[error("keyword whitelist must contain at least one keyword")]
    EmptyKeywordList,

    /// The keyword pattern failed to compile.
    #[error("invalid keyword pattern: {message}")]
    InvalidPattern { message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for search setup.
pub type SearchResult<T> = Result<T, SearchError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

impl From<regex::Error> for SearchError {
    fn from(err: regex::Error) -> Self {
        SearchError::InvalidPattern {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

impl StorageError {
    /// Shorthand for a not-found error.
    pub fn not_found(kind: &str, id: &str) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        })
    }

    /// Shorthand for a refused operation.
    pub fn forbidden(message: impl Into<String>) -> Self {
        StorageError::Permission(PermissionError::Forbidden {
            message: message.into(),
        })
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }
}
