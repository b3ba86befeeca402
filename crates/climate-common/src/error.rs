//! Error types for the climate services.

use thiserror::Error;

use crate::date::DateParseError;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Primary error type for climate queries.
#[derive(Debug, Error)]
pub enum ClimateError {
    // === Request Errors ===
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Not found.")]
    NotFound,

    // === Storage Errors ===
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ClimateError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ClimateError::InvalidDate(_) => 400,
            ClimateError::NotFound => 404,
            ClimateError::StorageUnavailable(_) => 503,
            ClimateError::DatabaseError(_) | ClimateError::InternalError(_) => 500,
        }
    }

    /// Whether the error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

impl From<DateParseError> for ClimateError {
    fn from(err: DateParseError) -> Self {
        ClimateError::InvalidDate(err.to_string())
    }
}
