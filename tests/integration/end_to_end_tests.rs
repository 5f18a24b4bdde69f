/*!
 * Import, register, search and review in one run
 */

use bookreview::importer::CatalogImporter;

use crate::common::{create_temp_dir, create_test_file, location, TestApp};

#[tokio::test]
async fn test_endToEnd_importRegisterSearchReview() {
    let app = TestApp::spawn().await;

    // Import the catalog
    let dir = create_temp_dir().unwrap();
    let csv = create_test_file(
        dir.path(),
        "books.csv",
        "isbn,title,author,year\n0001,Test Book,A. Author,2020\n",
    )
    .unwrap();
    let summary = CatalogImporter::new(app.db.clone())
        .import_file(&csv)
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);

    // Register and log in
    let mut client = app.client();
    let response = client
        .post_form("/register", &[("username", "alice"), ("password", "pw123")])
        .await;
    assert_eq!(location(&response), "/login?notice=registered");

    let response = client
        .post_form("/login", &[("username", "alice"), ("password", "pw123")])
        .await;
    assert_eq!(location(&response), "/");

    // Search
    let body = client.get("/search?book=Test").await.text().await.unwrap();
    assert!(body.contains("1 book found"));
    assert!(body.contains(r#"href="/book/0001""#));

    // View the book
    let response = client.get("/book/0001").await;
    assert_eq!(response.status(), 200);

    // Review it
    let response = client
        .post_form("/book/0001", &[("rating", "5"), ("comment", "Great")])
        .await;
    assert_eq!(location(&response), "/book/0001?notice=review_saved");

    // Any further review is rejected
    let response = client
        .post_form("/book/0001", &[("rating", "3"), ("comment", "Second thoughts")])
        .await;
    assert_eq!(location(&response), "/book/0001?notice=review_exists");

    let stats = app.db.stats().unwrap();
    assert_eq!(stats.book_count, 1);
    assert_eq!(stats.user_count, 1);
    assert_eq!(stats.review_count, 1);
}
