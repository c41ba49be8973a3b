//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// Validation error with message
    #[error("Validation error: {0}")]
    Validation(String),
    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Action attempted without a signed-in user
    #[error("Authentication required")]
    AuthenticationRequired,
    /// Credentials did not match
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Blob or local storage error
    #[error("Storage error: {0}")]
    Storage(String),
    /// External service error
    #[error("External service error: {0}")]
    External(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("Malformed stored document: {}", e))
    }
}
