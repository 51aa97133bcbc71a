//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity already exists (conflict)
    #[error("{0} already exists")]
    Conflict(String),

    /// Unknown username or wrong password. Deliberately carries no detail.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token was found but its lifetime has lapsed
    #[error("Token expired")]
    TokenExpired,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>) -> Self {
        DomainError::Conflict(entity.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures reported by a credential store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{0} already exists")]
    Conflict(String),

    /// The lookup matched nothing
    #[error("{0} not found")]
    NotFound(String),

    /// Any other persistence failure
    #[error("Store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Result type alias for credential store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(entity) => DomainError::Conflict(entity),
            StoreError::NotFound(entity) => DomainError::NotFound(entity),
            StoreError::Backend(msg) => DomainError::Internal(msg),
        }
    }
}
