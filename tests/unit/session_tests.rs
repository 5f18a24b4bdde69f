/*!
 * Tests for the session cookie attributes
 */

use axum::http::HeaderMap;
use cookie::SameSite;

use bookreview::app_config::SessionConfig;
use bookreview::session::SessionManager;

#[test]
fn test_setIdentity_cookie_shouldBeHttpOnlyLaxAndSessionScoped() {
    let sessions = SessionManager::new(SessionConfig::default());
    let cookie = sessions.set_identity(&HeaderMap::new(), "alice");

    assert_eq!(cookie.name(), "bookreview_session");
    assert_eq!(cookie.value().len(), 64);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), None);
    assert_ne!(cookie.secure(), Some(true));
}

#[test]
fn test_setIdentity_withSecureConfig_shouldMarkCookieSecure() {
    let sessions = SessionManager::new(SessionConfig {
        secure_cookie: true,
        ..SessionConfig::default()
    });
    let cookie = sessions.set_identity(&HeaderMap::new(), "alice");
    assert_eq!(cookie.secure(), Some(true));
}

#[test]
fn test_clearIdentity_cookie_shouldExpireImmediately() {
    let sessions = SessionManager::new(SessionConfig::default());
    let cookie = sessions.clear_identity(&HeaderMap::new());

    assert_eq!(cookie.value(), "");
    assert!(cookie.expires().is_some() || cookie.max_age().is_some());
}
