/*!
 * Session-specific models.
 *
 * The client only ever holds an opaque random token; the server keeps the
 * identity under the SHA-256 fingerprint of that token.
 */

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque token handed to the client in the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()))
    }

    /// Wrap a token received from a client
    pub fn from_client(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Server-side key for this token
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Server-side record for one logged-in client
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Logged-in user
    pub username: String,
    /// Last request carrying this session
    pub last_seen: DateTime<Utc>,
}

impl SessionEntry {
    pub fn new(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            last_seen: now,
        }
    }

    /// Whether the session has been idle longer than `idle_timeout`
    pub fn is_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_seen > idle_timeout
    }
}
