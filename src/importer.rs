/*!
 * Bulk import of the book catalog from a CSV file.
 *
 * The file starts with the header `isbn,title,author,year`. Rows are
 * upserted by ISBN inside a single transaction, so a failed import leaves
 * the catalog untouched and re-running an import changes nothing.
 */

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::database::catalog_store::UpsertOutcome;
use crate::database::{Book, CatalogStore, DatabaseConnection};

/// Expected header row, compared case-insensitively
pub const EXPECTED_HEADER: [&str; 4] = ["isbn", "title", "author", "year"];

/// Counters reported at the end of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Rows rejected before reaching the store
    pub skipped: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} unchanged, {} skipped",
            self.inserted, self.updated, self.unchanged, self.skipped
        )
    }
}

/// Loads catalog files into the store
pub struct CatalogImporter {
    db: DatabaseConnection,
    show_progress: bool,
}

impl CatalogImporter {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while rows are written
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Import a CSV file
    pub async fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportSummary> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open catalog file: {:?}", path))?;

        info!("Importing catalog from {:?}", path);
        self.import_reader(file).await
    }

    /// Import CSV data from any reader; parsing runs on the blocking pool
    pub async fn import_reader<R: Read + Send + 'static>(&self, reader: R) -> Result<ImportSummary> {
        let (books, skipped) = tokio::task::spawn_blocking(move || read_books(reader))
            .await
            .context("Catalog parsing task panicked")??;

        let progress = self.progress_bar(books.len() as u64);
        let bar = progress.clone();

        let mut summary = self
            .db
            .transaction_async(move |tx| {
                let mut summary = ImportSummary::default();
                for book in &books {
                    let outcome = CatalogStore::upsert_sync(tx, book)
                        .with_context(|| format!("Failed to store ISBN {}", book.isbn))?;
                    summary.record(outcome);
                    bar.inc(1);
                }
                Ok(summary)
            })
            .await?;

        summary.skipped = skipped;
        progress.finish_and_clear();

        info!("Catalog import finished: {}", summary);
        Ok(summary)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} books ({percent}%)")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar
    }
}

/// Parse and validate CSV rows.
///
/// Returns the books to store and the number of rows skipped.
pub fn read_books<R: Read>(reader: R) -> Result<(Vec<Book>, usize)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Failed to read catalog header")?;
    let header_matches = headers.len() == EXPECTED_HEADER.len()
        && headers
            .iter()
            .zip(EXPECTED_HEADER)
            .all(|(found, expected)| found.eq_ignore_ascii_case(expected));
    if !header_matches {
        return Err(anyhow!(
            "Unexpected catalog header {:?}, expected {}",
            headers.iter().collect::<Vec<_>>(),
            EXPECTED_HEADER.join(",")
        ));
    }

    let mut books = Vec::new();
    let mut skipped = 0;

    for (index, record) in csv_reader.records().enumerate() {
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        match book_from_record(&record) {
            Ok(book) => books.push(book),
            Err(reason) => {
                warn!("Skipping line {}: {}", line, reason);
                skipped += 1;
            }
        }
    }

    Ok((books, skipped))
}

fn book_from_record(record: &csv::StringRecord) -> Result<Book, String> {
    if record.len() != EXPECTED_HEADER.len() {
        return Err(format!("expected 4 fields, found {}", record.len()));
    }

    let field = |i: usize| record.get(i).unwrap_or_default();
    let (isbn, title, author, year) = (field(0), field(1), field(2), field(3));

    if isbn.is_empty() {
        return Err("missing ISBN".to_string());
    }
    if title.is_empty() {
        return Err(format!("missing title for ISBN {}", isbn));
    }
    let year: i32 = year
        .parse()
        .map_err(|_| format!("invalid year '{}' for ISBN {}", year, isbn))?;

    Ok(Book::new(isbn, title, author, year))
}
