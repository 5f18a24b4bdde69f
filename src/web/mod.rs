/*!
 * HTTP surface of the application.
 *
 * - `AppState`: the stores, session manager and gateway shared by all handlers
 * - `router`: route table with request logging
 * - `handlers`: one function per route
 * - `views`: HTML rendering
 */

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notice;
pub mod views;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::auth::DecoyHash;
use crate::database::{CatalogStore, CredentialStore, DatabaseConnection, ReviewStore};
use crate::gateway::RatingGateway;
use crate::session::SessionManager;

pub use extract::{CurrentUser, MaybeUser};
pub use notice::Notice;

/// Handles passed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub catalog: CatalogStore,
    pub reviews: ReviewStore,
    pub sessions: SessionManager,
    pub gateway: Arc<dyn RatingGateway>,
    /// bcrypt cost for new password hashes
    pub password_cost: u32,
    /// Verified when a login names an unknown user
    pub login_decoy: Arc<DecoyHash>,
}

impl AppState {
    /// Build the state around one shared database connection
    pub fn new(
        db: DatabaseConnection,
        sessions: SessionManager,
        gateway: Arc<dyn RatingGateway>,
        password_cost: u32,
    ) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone()),
            catalog: CatalogStore::new(db.clone()),
            reviews: ReviewStore::new(db),
            sessions,
            gateway,
            password_cost,
            login_decoy: Arc::new(DecoyHash::new(password_cost)),
        }
    }
}

/// Route table of the application
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::catalog::index))
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login_submit),
        )
        .route(
            "/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register_submit),
        )
        .route("/search", get(handlers::catalog::search))
        .route(
            "/book/:isbn",
            get(handlers::catalog::book_detail).post(handlers::catalog::submit_review),
        )
        .route("/api/:isbn", get(handlers::api::lookup))
        .fallback(handlers::catalog::not_found)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
