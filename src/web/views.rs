/*!
 * HTML rendering for the web pages.
 *
 * Pages are built from small string templates; every value coming from a
 * user or the store goes through `escape_html`.
 */

use axum::http::StatusCode;

use crate::database::{Book, ReviewSummary};
use crate::gateway::ReviewStatistics;

use super::notice::Notice;

/// Everything the book detail page shows
#[derive(Debug, Clone)]
pub struct BookPage {
    pub username: String,
    pub book: Book,
    pub reviews: Vec<ReviewSummary>,
    /// `None` when the rating service could not be reached
    pub statistics: Option<ReviewStatistics>,
    pub already_reviewed: bool,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    /// Values re-filled into the review form after a rejected submission
    pub draft_rating: String,
    pub draft_comment: String,
}

impl BookPage {
    /// Mean of the local review ratings
    pub fn local_average(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: i64 = self.reviews.iter().map(|r| i64::from(r.rating)).sum();
        Some(total as f64 / self.reviews.len() as f64)
    }
}

/// Escape text for use inside HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Path of a book's detail page
pub fn book_path(isbn: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(isbn.as_bytes()).collect();
    format!("/book/{}", encoded)
}

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
nav { display: flex; gap: 1rem; border-bottom: 1px solid #ccc; padding-bottom: .5rem; }
.notice { padding: .5rem; background: #e6f4ea; }
.error { padding: .5rem; background: #fce8e6; }
.stats-unavailable { color: #777; }
"#;

fn layout(title: &str, username: Option<&str>, body: &str) -> String {
    let nav = match username {
        Some(name) => format!(
            r#"<a href="/">Search</a><span>Logged in as {}</span><a href="/logout">Log out</a>"#,
            escape_html(name)
        ),
        None => r#"<a href="/login">Log in</a><a href="/register">Register</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Book Reviews</title>
<style>{style}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        nav = nav,
        body = body,
    )
}

fn messages(notice: Option<Notice>, error: Option<&str>) -> String {
    let mut html = String::new();
    if let Some(notice) = notice {
        let class = if notice.is_error() { "error" } else { "notice" };
        html.push_str(&format!(r#"<p class="{}">{}</p>"#, class, notice.message()));
    }
    if let Some(error) = error {
        html.push_str(&format!(r#"<p class="error">{}</p>"#, escape_html(error)));
    }
    html
}

pub fn login_page(notice: Option<Notice>, error: Option<&str>, username: &str) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{messages}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/register">Register</a></p>"#,
        messages = messages(notice, error),
        username = escape_html(username),
    );
    layout("Log in", None, &body)
}

pub fn register_page(username: Option<&str>, error: Option<&str>, draft_username: &str) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{messages}
<form method="post" action="/register">
<label>Username <input name="username" value="{draft}" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Register</button>
</form>"#,
        messages = messages(None, error),
        draft = escape_html(draft_username),
    );
    layout("Register", username, &body)
}

fn search_form(term: &str) -> String {
    format!(
        r#"<form method="get" action="/search">
<input name="book" value="{}" placeholder="ISBN, title or author">
<button type="submit">Search</button>
</form>"#,
        escape_html(term)
    )
}

pub fn index_page(username: &str, notice: Option<Notice>, error: Option<&str>, term: &str) -> String {
    let body = format!(
        "<h1>Find a book</h1>\n{}\n{}",
        messages(notice, error),
        search_form(term)
    );
    layout("Search", Some(username), &body)
}

pub fn results_page(username: &str, term: &str, books: &[Book]) -> String {
    let mut items = String::new();
    for book in books {
        items.push_str(&format!(
            r#"<li><a href="{href}">{title}</a> by {author} ({year}), ISBN {isbn}</li>
"#,
            href = book_path(&book.isbn),
            title = escape_html(&book.title),
            author = escape_html(&book.author),
            year = book.year,
            isbn = escape_html(&book.isbn),
        ));
    }

    let count = match books.len() {
        0 => "No books found".to_string(),
        1 => "1 book found".to_string(),
        n => format!("{} books found", n),
    };

    let body = format!(
        r#"<h1>Results for "{term}"</h1>
{form}
<p class="count">{count}</p>
<ul class="results">
{items}</ul>"#,
        term = escape_html(term),
        form = search_form(term),
        count = count,
        items = items,
    );
    layout("Results", Some(username), &body)
}

pub fn book_page(page: &BookPage) -> String {
    let book = &page.book;

    let statistics = match page.statistics {
        Some(stats) => format!(
            r#"<p class="stats">Goodreads: {} ratings, average {:.2}</p>"#,
            stats.review_count, stats.average_score
        ),
        None => r#"<p class="stats-unavailable">Goodreads statistics are currently unavailable.</p>"#
            .to_string(),
    };

    let local = match page.local_average() {
        Some(avg) => format!(
            "<p>{} review(s) here, average {:.1}</p>",
            page.reviews.len(),
            avg
        ),
        None => "<p>No reviews yet.</p>".to_string(),
    };

    let mut reviews = String::new();
    for review in &page.reviews {
        reviews.push_str(&format!(
            "<li><strong>{}</strong> rated it {}/5: {}</li>\n",
            escape_html(&review.username),
            review.rating,
            escape_html(&review.comment),
        ));
    }

    let form = if page.already_reviewed {
        "<p>You have reviewed this book.</p>".to_string()
    } else {
        let mut options = String::new();
        for score in 1..=5 {
            let selected = if page.draft_rating == score.to_string() { " selected" } else { "" };
            options.push_str(&format!(r#"<option value="{0}"{1}>{0}</option>"#, score, selected));
        }
        format!(
            r#"<h2>Write a review</h2>
<form method="post" action="{action}">
<label>Rating <select name="rating">{options}</select></label>
<label>Comment <textarea name="comment" required>{comment}</textarea></label>
<button type="submit">Submit review</button>
</form>"#,
            action = book_path(&book.isbn),
            options = options,
            comment = escape_html(&page.draft_comment),
        )
    };

    let body = format!(
        r#"<h1>{title}</h1>
{messages}
<dl>
<dt>Author</dt><dd>{author}</dd>
<dt>Year</dt><dd>{year}</dd>
<dt>ISBN</dt><dd>{isbn}</dd>
</dl>
{statistics}
<h2>Reviews</h2>
{local}
<ul class="reviews">
{reviews}</ul>
{form}"#,
        title = escape_html(&book.title),
        messages = messages(page.notice, page.error.as_deref()),
        author = escape_html(&book.author),
        year = book.year,
        isbn = escape_html(&book.isbn),
        statistics = statistics,
        local = local,
        reviews = reviews,
        form = form,
    );
    layout(&book.title, Some(&page.username), &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to search</a></p>",
        status.as_u16(),
        escape_html(heading),
        escape_html(message)
    );
    layout(heading, None, &body)
}
