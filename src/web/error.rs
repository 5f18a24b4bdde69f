/*!
 * HTTP rendering of application errors.
 */

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::{error, warn};

use crate::errors::{AppError, GatewayError, StoreError};

use super::views;

impl AppError {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::UsernameTaken(_) | StoreError::DuplicateReview { .. }) => {
                StatusCode::CONFLICT
            }
            Self::Gateway(GatewayError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Config(_) | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the log
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Something went wrong while handling your request.".to_string()
        } else {
            warn!("Request rejected: {}", self);
            match &self {
                Self::NotFound(msg) => msg.clone(),
                other => other.to_string(),
            }
        };

        (status, Html(views::error_page(status, &message))).into_response()
    }
}
