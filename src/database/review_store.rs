/*!
 * Review store: one review per user and book.
 */

use anyhow::Result;
use log::info;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::is_unique_violation;
use super::models::{Review, ReviewSummary};
use crate::errors::StoreError;

/// Access to the `reviews` table
#[derive(Clone)]
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The review a user left for a book, if any
    pub async fn find_by_user_and_isbn(&self, username: &str, isbn: &str) -> Result<Option<Review>> {
        let username = username.to_string();
        let isbn = isbn.to_string();

        self.db
            .execute_async(move |conn| {
                let review = conn
                    .query_row(
                        r#"
                        SELECT username, isbn, rating, comment, created_at
                        FROM reviews WHERE username = ?1 AND isbn = ?2
                        "#,
                        params![username, isbn],
                        |row| {
                            Ok(Review {
                                username: row.get(0)?,
                                isbn: row.get(1)?,
                                rating: row.get(2)?,
                                comment: row.get(3)?,
                                created_at: row.get(4)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(review)
            })
            .await
    }

    /// All reviews of a book, oldest first
    pub async fn list_for_isbn(&self, isbn: &str) -> Result<Vec<ReviewSummary>> {
        let isbn = isbn.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT username, comment, rating FROM reviews WHERE isbn = ?1 ORDER BY id",
                )?;

                let reviews = stmt
                    .query_map([isbn], |row| {
                        Ok(ReviewSummary {
                            username: row.get(0)?,
                            comment: row.get(1)?,
                            rating: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(reviews)
            })
            .await
    }

    /// Store a review.
    ///
    /// Callers check `find_by_user_and_isbn` first; this does not repeat the
    /// check, but a violation of the (username, isbn) constraint still comes
    /// back as `DuplicateReview` rather than a generic failure.
    pub async fn insert(
        &self,
        username: &str,
        isbn: &str,
        rating: i32,
        comment: &str,
    ) -> Result<(), StoreError> {
        let (user, book) = (username.to_string(), isbn.to_string());
        let comment = comment.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = self
            .db
            .execute_async(move |conn| {
                match conn.execute(
                    r#"
                    INSERT INTO reviews (username, isbn, rating, comment, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![user, book, rating, comment, now],
                ) {
                    Ok(_) => Ok(true),
                    Err(e) if is_unique_violation(&e) => Ok(false),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        if !inserted {
            return Err(StoreError::DuplicateReview {
                username: username.to_string(),
                isbn: isbn.to_string(),
            });
        }

        info!("Stored {}-star review of {} by '{}'", rating, isbn, username);
        Ok(())
    }
}
