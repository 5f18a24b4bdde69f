/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// Registered user. Only the salted hash of the password is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique login name
    pub username: String,
    /// bcrypt hash (includes the salt)
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
        }
    }
}

/// A stored review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    /// Reviewer
    pub username: String,
    /// Reviewed book
    pub isbn: String,
    /// Score, 1 to 5
    pub rating: i32,
    /// Free-text comment, never empty
    pub comment: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Review as shown on a book page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewSummary {
    pub username: String,
    pub comment: String,
    pub rating: i32,
}
