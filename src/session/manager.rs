/*!
 * Session manager for login state.
 *
 * This module handles:
 * - Reading the identity bound to a request's session cookie
 * - Binding an identity on login (always under a freshly issued token)
 * - Clearing the identity on logout
 * - Idle expiry and periodic cleanup
 */

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::SessionConfig;

use super::models::{SessionEntry, SessionToken};

/// Server-side session table keyed by token fingerprint
#[derive(Clone)]
pub struct SessionManager {
    /// Fingerprint -> entry
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    /// Cookie and expiry settings
    config: SessionConfig,
}

impl SessionManager {
    /// Create an empty session manager
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    fn idle_timeout(&self) -> Duration {
        let secs = i64::try_from(self.config.idle_timeout_secs).unwrap_or(i64::MAX);
        Duration::seconds(secs.min(i64::MAX / 1000))
    }

    /// Find this manager's cookie among the request's Cookie headers
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<SessionToken> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value))
            .filter_map(|cookie| cookie.ok())
            .find(|cookie| cookie.name() == self.config.cookie_name)
            .map(|cookie| SessionToken::from_client(cookie.value()))
    }

    /// Identity bound to the request, if any.
    ///
    /// Touches the session so activity keeps it alive; an expired session
    /// is dropped and reads as anonymous.
    pub fn get_identity(&self, headers: &HeaderMap) -> Option<String> {
        let token = self.token_from_headers(headers)?;
        self.identity_for_token(&token, Utc::now())
    }

    fn identity_for_token(&self, token: &SessionToken, now: DateTime<Utc>) -> Option<String> {
        let key = token.fingerprint();
        let mut sessions = self.sessions.write();

        let expired = match sessions.get_mut(&key) {
            None => return None,
            Some(entry) if entry.is_expired(now, self.idle_timeout()) => true,
            Some(entry) => {
                entry.last_seen = now;
                return Some(entry.username.clone());
            }
        };

        if expired {
            sessions.remove(&key);
            debug!("Session {} expired", &key[..8]);
        }
        None
    }

    /// Bind `username` to the client.
    ///
    /// Any session the request already carries is destroyed and a new token
    /// is issued; the returned cookie must be sent with the response.
    pub fn set_identity(&self, headers: &HeaderMap, username: &str) -> Cookie<'static> {
        let token = SessionToken::generate();
        let key = token.fingerprint();

        {
            let mut sessions = self.sessions.write();
            if let Some(old) = self.token_from_headers(headers) {
                sessions.remove(&old.fingerprint());
            }
            sessions.insert(key.clone(), SessionEntry::new(username, Utc::now()));
        }

        info!("Session {} opened for '{}'", &key[..8], username);
        self.session_cookie(token.as_str().to_string())
    }

    /// Forget the identity bound to the client.
    ///
    /// Returns a cookie that makes the browser drop the token.
    pub fn clear_identity(&self, headers: &HeaderMap) -> Cookie<'static> {
        if let Some(token) = self.token_from_headers(headers) {
            let key = token.fingerprint();
            if let Some(entry) = self.sessions.write().remove(&key) {
                info!("Session {} closed for '{}'", &key[..8], entry.username);
            }
        }

        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure_cookie)
            .build()
    }

    /// Drop every session idle for longer than the configured timeout
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let idle = self.idle_timeout();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, idle));
        let purged = before - sessions.len();

        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        purged
    }

    /// Number of live sessions
    pub fn active_sessions(&self) -> usize {
        self.sessions.read().len()
    }

    /// Run `purge_expired` forever at the configured interval
    pub fn spawn_purge_task(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        let period = std::time::Duration::from_secs(self.config.purge_interval_secs.max(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                manager.purge_expired();
            }
        })
    }
}
