/*!
 * Tests for the catalog importer
 */

use bookreview::database::{CatalogStore, DatabaseConnection};
use bookreview::importer::{CatalogImporter, ImportSummary};

use crate::common::{create_temp_dir, create_test_file};

#[tokio::test]
async fn test_importFile_shouldInsertRowsAndCountSkipped() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "books.csv",
        "isbn,title,author,year\n\
         0380795272,Krondor: The Betrayal,Raymond E. Feist,1998\n\
         1416949658,The Dark Is Rising,Susan Cooper,1973\n\
         0000,Broken,Nobody,not-a-year\n",
    )
    .unwrap();

    let db = DatabaseConnection::new_in_memory().unwrap();
    let summary = CatalogImporter::new(db.clone()).import_file(&path).await.unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            inserted: 2,
            updated: 0,
            unchanged: 0,
            skipped: 1
        }
    );
    assert_eq!(summary.to_string(), "2 inserted, 0 updated, 0 unchanged, 1 skipped");

    let book = CatalogStore::new(db).get_by_isbn("1416949658").await.unwrap().unwrap();
    assert_eq!(book.author, "Susan Cooper");
    assert_eq!(book.year, 1973);
}

#[tokio::test]
async fn test_importFile_withMissingFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let db = DatabaseConnection::new_in_memory().unwrap();
    let result = CatalogImporter::new(db).import_file(dir.path().join("absent.csv")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_importFile_withBadHeader_shouldLeaveCatalogUntouched() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "books.csv", "title,isbn\nX,0001\n").unwrap();

    let db = DatabaseConnection::new_in_memory().unwrap();
    let result = CatalogImporter::new(db.clone()).import_file(&path).await;
    assert!(result.is_err());
    assert_eq!(db.stats().unwrap().book_count, 0);
}

#[tokio::test]
async fn test_importFile_withDuplicateIsbnInFile_shouldKeepLastRow() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "books.csv",
        "isbn,title,author,year\n0001,First,A,2000\n0001,Second,A,2000\n",
    )
    .unwrap();

    let db = DatabaseConnection::new_in_memory().unwrap();
    let summary = CatalogImporter::new(db.clone()).import_file(&path).await.unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);

    let book = CatalogStore::new(db).get_by_isbn("0001").await.unwrap().unwrap();
    assert_eq!(book.title, "Second");
}
