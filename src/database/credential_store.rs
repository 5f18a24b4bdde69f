/*!
 * Credential store: usernames and salted password hashes.
 */

use anyhow::Result;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::is_unique_violation;
use super::models::User;
use crate::errors::StoreError;

/// Access to the `users` table
#[derive(Clone)]
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Exact-match lookup; `None` when the user does not exist
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();

        self.db
            .execute_async(move |conn| Self::find_by_username_sync(conn, &username))
            .await
    }

    fn find_by_username_sync(conn: &Connection, username: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT username, password_hash FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        username: row.get(0)?,
                        password_hash: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Create a user unless the name is already taken.
    ///
    /// The existence check and the insert share one transaction. A unique
    /// constraint violation from a concurrent writer is reported as
    /// `UsernameTaken` as well.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        let username = username.to_string();
        let password_hash = password_hash.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let name = username.clone();

        let inserted = self
            .db
            .transaction_async(move |tx| {
                if Self::find_by_username_sync(tx, &name)?.is_some() {
                    return Ok(false);
                }

                match tx.execute(
                    "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                    params![name, password_hash, now],
                ) {
                    Ok(_) => Ok(true),
                    Err(e) if is_unique_violation(&e) => Ok(false),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        if inserted {
            info!("Registered user '{}'", username);
            Ok(())
        } else {
            debug!("Registration refused, username '{}' exists", username);
            Err(StoreError::UsernameTaken(username))
        }
    }
}
