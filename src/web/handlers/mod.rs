/*!
 * Route handlers.
 *
 * - `auth`: login, logout and registration
 * - `catalog`: search and book detail pages, review submission
 * - `api`: public JSON lookup
 */

pub mod api;
pub mod auth;
pub mod catalog;

use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use cookie::Cookie;
use log::{debug, warn};

use crate::errors::GatewayError;
use crate::gateway::{RatingGateway, ReviewStatistics};

/// Statistics for a book, or `None` when the rating service is unavailable
pub(crate) async fn fetch_statistics(
    gateway: &dyn RatingGateway,
    isbn: &str,
) -> Option<ReviewStatistics> {
    match gateway.get_statistics(isbn).await {
        Ok(stats) => Some(stats),
        Err(GatewayError::NotConfigured) => {
            debug!("Rating service not configured, skipping statistics for {}", isbn);
            None
        }
        Err(e) => {
            warn!("Statistics unavailable for {}: {}", isbn, e);
            None
        }
    }
}

/// Redirect that also sets (or removes) the session cookie
pub(crate) fn redirect_with_cookie(to: &str, cookie: Cookie<'static>) -> Response {
    ([(header::SET_COOKIE, cookie.to_string())], Redirect::to(to)).into_response()
}
