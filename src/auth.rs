/*!
 * Password hashing and credential input checks.
 *
 * bcrypt is CPU-bound, so hashing and verification run on tokio's blocking
 * pool instead of the async workers.
 */

use anyhow::{anyhow, Context, Result};
use tokio::sync::OnceCell;
use uuid::Uuid;

/// bcrypt truncates input beyond this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with a fresh salt
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| anyhow!("Failed to hash password: {}", e))
    })
    .await
    .context("Password hashing task panicked")?
}

/// Check a password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task panicked")?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            Ok(false)
        }
    }
}

/// Hash of a random password, verified in place of a missing user's hash.
///
/// Computed on first use at the configured cost.
pub struct DecoyHash {
    cost: u32,
    hash: OnceCell<String>,
}

impl DecoyHash {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            hash: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&str> {
        let cost = self.cost;
        let hash = self
            .hash
            .get_or_try_init(|| async move { hash_password(&Uuid::new_v4().to_string(), cost).await })
            .await?;
        Ok(hash.as_str())
    }
}

/// Check a login attempt.
///
/// Unknown users cost one bcrypt verification too, against `decoy`.
pub async fn verify_login(password: &str, stored_hash: Option<&str>, decoy: &DecoyHash) -> Result<bool> {
    match stored_hash {
        Some(hash) => verify_password(password, hash).await,
        None => {
            verify_password(password, decoy.get().await?).await?;
            Ok(false)
        }
    }
}

/// Validate registration input, returning a user-facing message on failure
pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.trim() != username {
        return Err("Username cannot start or end with spaces".to_string());
    }
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password cannot be longer than {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}
