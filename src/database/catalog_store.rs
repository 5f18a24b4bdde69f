/*!
 * Catalog store: book lookup and substring search.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::DatabaseConnection;
use super::models::Book;

/// What an upsert did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Access to the `books` table
#[derive(Clone)]
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive substring search over ISBN, title and author.
    ///
    /// The term is trimmed and matched literally (`%`, `_` and `\` are
    /// escaped). Results come back in insertion order. Callers reject empty
    /// terms before calling this.
    pub async fn search(&self, term: &str) -> Result<Vec<Book>> {
        let pattern = format!("%{}%", escape_like(term.trim()));
        debug!("Searching catalog with pattern {}", pattern);

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT isbn, title, author, year FROM books
                    WHERE fold(isbn) LIKE fold(?1) ESCAPE '\'
                       OR fold(title) LIKE fold(?1) ESCAPE '\'
                       OR fold(author) LIKE fold(?1) ESCAPE '\'
                    ORDER BY rowid
                    "#,
                )?;

                let books = stmt
                    .query_map([pattern], book_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(books)
            })
            .await
    }

    /// Exact ISBN lookup
    pub async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let isbn = isbn.to_string();

        self.db
            .execute_async(move |conn| {
                let book = conn
                    .query_row(
                        "SELECT isbn, title, author, year FROM books WHERE isbn = ?1",
                        [isbn],
                        book_from_row,
                    )
                    .optional()?;
                Ok(book)
            })
            .await
    }

    /// Insert or refresh a book inside an open transaction
    pub fn upsert_sync(conn: &Connection, book: &Book) -> Result<UpsertOutcome> {
        let existing = conn
            .query_row(
                "SELECT isbn, title, author, year FROM books WHERE isbn = ?1",
                [&book.isbn],
                book_from_row,
            )
            .optional()?;

        match existing {
            None => {
                conn.execute(
                    "INSERT INTO books (isbn, title, author, year) VALUES (?1, ?2, ?3, ?4)",
                    params![book.isbn, book.title, book.author, book.year],
                )?;
                Ok(UpsertOutcome::Inserted)
            }
            Some(ref current) if current == book => Ok(UpsertOutcome::Unchanged),
            Some(_) => {
                conn.execute(
                    "UPDATE books SET title = ?2, author = ?3, year = ?4 WHERE isbn = ?1",
                    params![book.isbn, book.title, book.author, book.year],
                )?;
                Ok(UpsertOutcome::Updated)
            }
        }
    }

    /// Insert or refresh a single book
    pub async fn upsert(&self, book: &Book) -> Result<UpsertOutcome> {
        let book = book.clone();
        self.db
            .transaction_async(move |tx| Self::upsert_sync(tx, &book))
            .await
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        isbn: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
    })
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
