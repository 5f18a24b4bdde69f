/*!
 * Error types for the bookreview application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the external rating service
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Error when sending the request fails
    #[error("Rating request failed: {0}")]
    RequestFailed(String),

    /// The upstream did not answer within the configured timeout
    #[error("Rating request timed out: {0}")]
    Timeout(String),

    /// Error returned by the rating service itself
    #[error("Rating service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// The rating service has no statistics for this ISBN
    #[error("No rating statistics for ISBN {0}")]
    NotFound(String),

    /// Error when the response does not have the expected shape
    #[error("Failed to parse rating response: {0}")]
    ParseError(String),

    /// No API key was configured, so the service is never called
    #[error("Rating service is not configured")]
    NotConfigured,
}

/// Errors raised by the relational stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user with this name already exists
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// The user already reviewed this book
    #[error("User '{username}' already reviewed ISBN {isbn}")]
    DuplicateReview {
        /// Reviewer
        username: String,
        /// Reviewed book
        isbn: String,
    },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        Self::Database(format!("{:#}", error))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the rating gateway
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error from a store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
