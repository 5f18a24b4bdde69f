/*!
 * Common test utilities for the bookreview test suite
 *
 * `TestApp` serves the real router on an ephemeral port with an in-memory
 * store and a mock gateway. `TestClient` talks to it without following
 * redirects and carries the session cookie by hand.
 */

use anyhow::Result;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{redirect, Client, Response};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use bookreview::app_config::SessionConfig;
use bookreview::database::{Book, CatalogStore, DatabaseConnection};
use bookreview::session::SessionManager;
use bookreview::web::{router, AppState};


use mock_gateway::MockGateway;

/// bcrypt cost used by tests
pub const TEST_PASSWORD_COST: u32 = 4;

/// Initialize test logging once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// The book used throughout the tests
pub fn test_book() -> Book {
    Book::new("0001", "Test Book", "A. Author", 2020)
}

/// A running application
pub struct TestApp {
    pub address: SocketAddr,
    pub db: DatabaseConnection,
    pub gateway: MockGateway,
    pub state: AppState,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Serve the application with a default mock gateway
    pub async fn spawn() -> Self {
        Self::spawn_with_gateway(MockGateway::default()).await
    }

    /// Serve the application with the given mock gateway
    pub async fn spawn_with_gateway(gateway: MockGateway) -> Self {
        init_logging();

        let db = DatabaseConnection::new_in_memory().expect("in-memory store");
        let state = AppState::new(
            db.clone(),
            SessionManager::new(SessionConfig::default()),
            Arc::new(gateway.clone()),
            TEST_PASSWORD_COST,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("local address");

        let app = router(state.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        Self {
            address,
            db,
            gateway,
            state,
            server,
        }
    }

    /// A client with no session
    pub fn client(&self) -> TestClient {
        TestClient::new(self.address)
    }

    /// Insert books directly into the catalog
    pub async fn seed_books(&self, books: &[Book]) {
        let catalog = CatalogStore::new(self.db.clone());
        for book in books {
            catalog.upsert(book).await.expect("seed book");
        }
    }

    /// Register a user and return a client logged in as that user
    pub async fn logged_in_client(&self, username: &str, password: &str) -> TestClient {
        let mut client = self.client();
        let response = client
            .post_form("/register", &[("username", username), ("password", password)])
            .await;
        assert_eq!(response.status(), 303, "registration of {} failed", username);

        let response = client
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        assert_eq!(location(&response), "/");
        assert!(client.has_session(), "login of {} set no cookie", username);
        client
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// HTTP client that keeps the session cookie between requests
pub struct TestClient {
    client: Client,
    base_url: String,
    cookie_name: String,
    session: Option<String>,
}

impl TestClient {
    fn new(address: SocketAddr) -> Self {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("reqwest client");

        Self {
            client,
            base_url: format!("http://{}", address),
            cookie_name: SessionConfig::default().cookie_name,
            session: None,
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Raw `name=value` pair sent as the Cookie header
    pub fn session_cookie(&self) -> Option<String> {
        self.session.clone()
    }

    /// Replace the session cookie, e.g. to replay an old token
    pub fn set_session_cookie(&mut self, cookie: Option<String>) {
        self.session = cookie;
    }

    pub async fn get(&mut self, path: &str) -> Response {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(cookie) = &self.session {
            request = request.header(COOKIE, cookie.clone());
        }
        let response = request.send().await.expect("GET request");
        self.remember_cookie(&response);
        response
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Response {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .form(form);
        if let Some(cookie) = &self.session {
            request = request.header(COOKIE, cookie.clone());
        }
        let response = request.send().await.expect("POST request");
        self.remember_cookie(&response);
        response
    }

    fn remember_cookie(&mut self, response: &Response) {
        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(text) = value.to_str() else { continue };
            let Ok(cookie) = cookie::Cookie::parse(text.to_string()) else { continue };
            if cookie.name() != self.cookie_name {
                continue;
            }
            self.session = if cookie.value().is_empty() {
                None
            } else {
                Some(format!("{}={}", cookie.name(), cookie.value()))
            };
        }
    }
}

/// Location header of a redirect
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
