use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::{Deserialize, Serialize};

use crate::database::Book;
use crate::gateway::ReviewStatistics;
use crate::web::AppState;

use super::fetch_statistics;

/// Successful lookup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub isbn: String,
    /// `None` when the rating service is unavailable
    pub review_count: Option<u64>,
    pub average_score: Option<f64>,
}

impl BookDocument {
    pub fn new(book: Book, statistics: Option<ReviewStatistics>) -> Self {
        Self {
            title: book.title,
            author: book.author,
            year: book.year,
            isbn: book.isbn,
            review_count: statistics.map(|s| s.review_count),
            average_score: statistics.map(|s| s.average_score),
        }
    }
}

/// Error document with the HTTP status repeated in `code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ErrorDocument {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// GET /api/:isbn
pub async fn lookup(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookDocument>, ErrorDocument> {
    let book = match state.catalog.get_by_isbn(&isbn).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            return Err(ErrorDocument {
                code: StatusCode::NOT_FOUND.as_u16(),
                message: format!("No book with ISBN {}", isbn),
            })
        }
        Err(e) => {
            error!("Lookup of {} failed: {:#}", isbn, e);
            return Err(ErrorDocument {
                code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: "Internal server error".to_string(),
            });
        }
    };

    let statistics = fetch_statistics(state.gateway.as_ref(), &book.isbn).await;
    Ok(Json(BookDocument::new(book, statistics)))
}
