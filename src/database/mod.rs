/*!
 * Database module for persistent storage of users, books and reviews.
 *
 * This module provides SQLite-based persistence for:
 * - Credentials (username and password hash)
 * - The book catalog, filled by the bulk importer
 * - Reviews, at most one per user and book
 */

pub mod schema;
pub mod connection;
pub mod models;
pub mod credential_store;
pub mod catalog_store;
pub mod review_store;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use credential_store::CredentialStore;
pub use catalog_store::{CatalogStore, UpsertOutcome};
pub use review_store::ReviewStore;
pub use models::{Book, Review, ReviewSummary, User};

/// Whether a rusqlite error is a UNIQUE / PRIMARY KEY violation
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}
