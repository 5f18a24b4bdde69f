/*!
 * Tests for registration, login and logout
 */

use crate::common::{location, TestApp};

#[tokio::test]
async fn test_register_sameUsernameTwice_shouldKeepOneUserAndReportConflict() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let first = client
        .post_form("/register", &[("username", "alice"), ("password", "pw123")])
        .await;
    assert_eq!(first.status(), 303);
    assert_eq!(location(&first), "/login?notice=registered");

    let second = client
        .post_form("/register", &[("username", "alice"), ("password", "other")])
        .await;
    assert_eq!(second.status(), 200);
    let body = second.text().await.unwrap();
    assert!(body.contains("already taken"));
    assert!(body.contains(r#"value="alice""#));

    assert_eq!(app.db.stats().unwrap().user_count, 1);
}

#[tokio::test]
async fn test_register_withEmptyFields_shouldRenderInlineError() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let response = client
        .post_form("/register", &[("username", "   "), ("password", "pw123")])
        .await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Username cannot be empty"));

    let response = client
        .post_form("/register", &[("username", "bob"), ("password", "")])
        .await;
    assert!(response.text().await.unwrap().contains("Password cannot be empty"));

    assert_eq!(app.db.stats().unwrap().user_count, 0);
}

#[tokio::test]
async fn test_login_withCorrectPassword_shouldAuthenticate() {
    let app = TestApp::spawn().await;
    let mut client = app.logged_in_client("alice", "pw123").await;

    let home = client.get("/").await;
    assert_eq!(home.status(), 200);
    assert!(home.text().await.unwrap().contains("Logged in as alice"));
}

#[tokio::test]
async fn test_login_withWrongPassword_shouldRefuseAndSetNoIdentity() {
    let app = TestApp::spawn().await;
    let mut client = app.client();
    client
        .post_form("/register", &[("username", "alice"), ("password", "pw123")])
        .await;

    for wrong in ["pw124", "", "PW123", "pw123 "] {
        let response = client
            .post_form("/login", &[("username", "alice"), ("password", wrong)])
            .await;
        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("Invalid username or password"));
        assert!(!client.has_session());
    }

    let home = client.get("/").await;
    assert_eq!(home.status(), 303);
    assert_eq!(location(&home), "/login");
    assert_eq!(app.state.sessions.active_sessions(), 0);
}

#[tokio::test]
async fn test_login_withUnknownUser_shouldRefuse() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let response = client
        .post_form("/login", &[("username", "nobody"), ("password", "pw")])
        .await;
    assert_eq!(response.status(), 200);
    assert!(!client.has_session());
    assert!(response.text().await.unwrap().contains("Invalid username or password"));

    // Unknown users are checked against a real bcrypt hash at the configured cost
    let decoy = app.state.login_decoy.get().await.unwrap();
    assert!(decoy.starts_with("$2"));
    assert!(decoy.contains("$04$"));
}

#[tokio::test]
async fn test_loginPage_whenAlreadyLoggedIn_shouldRedirectHomeWithNotice() {
    let app = TestApp::spawn().await;
    let mut client = app.logged_in_client("alice", "pw123").await;

    let response = client.get("/login").await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/?notice=already_signed_in");

    let response = client
        .post_form("/login", &[("username", "alice"), ("password", "pw123")])
        .await;
    assert_eq!(location(&response), "/?notice=already_signed_in");

    let home = client.get("/?notice=already_signed_in").await;
    assert!(home.text().await.unwrap().contains("already logged in"));
}

#[tokio::test]
async fn test_login_afterLogout_shouldIssueFreshToken() {
    let app = TestApp::spawn().await;
    let mut client = app.logged_in_client("alice", "pw123").await;
    let first = client.session_cookie();

    // Log in again from the same browser after logging out
    client.get("/logout").await;
    client
        .post_form("/login", &[("username", "alice"), ("password", "pw123")])
        .await;
    let second = client.session_cookie();
    assert!(second.is_some());
    assert_ne!(first, second);

    client.set_session_cookie(first);
    let response = client.get("/").await;
    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_logout_shouldClearIdentityAndForwardNotice() {
    let app = TestApp::spawn().await;
    let mut client = app.logged_in_client("alice", "pw123").await;
    let old_cookie = client.session_cookie();

    let response = client.get("/logout").await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/?notice=signed_out");
    assert!(!client.has_session());
    assert_eq!(app.state.sessions.active_sessions(), 0);

    let home = client.get("/?notice=signed_out").await;
    assert_eq!(location(&home), "/login?notice=signed_out");

    let login = client.get("/login?notice=signed_out").await;
    assert!(login.text().await.unwrap().contains("You have been logged out"));

    // The old token is dead server-side too
    client.set_session_cookie(old_cookie);
    let response = client.get("/search?book=Test").await;
    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_logout_viaPost_whenAnonymous_shouldStillRedirect() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let response = client.post_form("/logout", &[]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/?notice=signed_out");
}

#[tokio::test]
async fn test_registerPage_shouldRenderForm() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let response = client.get("/register").await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains(r#"action="/register""#));

    let login = client.get("/login?notice=registered").await;
    assert!(login.text().await.unwrap().contains("Registration successful"));
}
