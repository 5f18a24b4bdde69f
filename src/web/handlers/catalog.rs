use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::database::Book;
use crate::errors::{AppError, StoreError};
use crate::web::extract::CurrentUser;
use crate::web::notice::{Notice, NoticeQuery};
use crate::web::views::{self, BookPage};
use crate::web::AppState;

use super::fetch_statistics;

/// `?book=` search parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub book: Option<String>,
}

/// Fields of the review form
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub comment: String,
}

impl ReviewForm {
    /// Validated `(rating, comment)`, or a user-facing message
    pub fn validate(&self) -> Result<(i32, &str), &'static str> {
        let rating = self
            .rating
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or("Please choose a rating between 1 and 5.")?;

        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err("Please write a comment for your review.");
        }
        Ok((rating, comment))
    }
}

/// GET /
pub async fn index(CurrentUser(username): CurrentUser, Query(query): Query<NoticeQuery>) -> Html<String> {
    Html(views::index_page(&username, query.notice(), None, ""))
}

/// GET /search?book=
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    let term = query.book.as_deref().unwrap_or_default().trim();
    if term.is_empty() {
        return Ok(Html(views::index_page(
            &username,
            None,
            Some("Please enter an ISBN, title or author to search for."),
            "",
        )));
    }

    let books = state.catalog.search(term).await?;
    Ok(Html(views::results_page(&username, term, &books)))
}

async fn find_book(state: &AppState, isbn: &str) -> Result<Book, AppError> {
    state
        .catalog
        .get_by_isbn(isbn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No book with ISBN {}", isbn)))
}

async fn load_book_page(state: &AppState, username: String, book: Book) -> Result<BookPage, AppError> {
    let reviews = state.reviews.list_for_isbn(&book.isbn).await?;
    let already_reviewed = state
        .reviews
        .find_by_user_and_isbn(&username, &book.isbn)
        .await?
        .is_some();
    let statistics = fetch_statistics(state.gateway.as_ref(), &book.isbn).await;

    Ok(BookPage {
        username,
        book,
        reviews,
        statistics,
        already_reviewed,
        notice: None,
        error: None,
        draft_rating: String::new(),
        draft_comment: String::new(),
    })
}

/// GET /book/:isbn
pub async fn book_detail(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Path(isbn): Path<String>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let book = find_book(&state, &isbn).await?;
    let mut page = load_book_page(&state, username, book).await?;
    page.notice = query.notice();
    Ok(Html(views::book_page(&page)))
}

/// POST /book/:isbn
pub async fn submit_review(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Path(isbn): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let book = find_book(&state, &isbn).await?;
    let back = views::book_path(&book.isbn);

    if state
        .reviews
        .find_by_user_and_isbn(&username, &book.isbn)
        .await?
        .is_some()
    {
        return Ok(Redirect::to(&Notice::ReviewExists.attach_to(&back)).into_response());
    }

    let (rating, comment) = match form.validate() {
        Ok(valid) => valid,
        Err(message) => {
            let mut page = load_book_page(&state, username, book).await?;
            page.error = Some(message.to_string());
            page.draft_rating = form.rating.trim().to_string();
            page.draft_comment = form.comment.clone();
            return Ok(Html(views::book_page(&page)).into_response());
        }
    };

    match state.reviews.insert(&username, &book.isbn, rating, comment).await {
        Ok(()) => Ok(Redirect::to(&Notice::ReviewSaved.attach_to(&back)).into_response()),
        Err(StoreError::DuplicateReview { .. }) => {
            Ok(Redirect::to(&Notice::ReviewExists.attach_to(&back)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Any unmatched route
pub async fn not_found() -> AppError {
    AppError::NotFound("The page you requested does not exist.".to_string())
}
