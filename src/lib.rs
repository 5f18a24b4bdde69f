/*!
 * # bookreview
 *
 * A small web application for browsing and reviewing books.
 *
 * ## Features
 *
 * - Registration and login with bcrypt password hashes
 * - Server-side sessions behind an opaque cookie
 * - Case-insensitive catalog search by ISBN, title or author
 * - Book pages with local reviews and statistics from an external rating service
 * - One review per user and book
 * - Public JSON lookup by ISBN
 * - Idempotent bulk import of the catalog from CSV
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite persistence:
 *   - `database::credential_store`: users and password hashes
 *   - `database::catalog_store`: book lookup and search
 *   - `database::review_store`: reviews
 * - `session`: Login sessions
 * - `auth`: Password hashing
 * - `gateway`: Client for the external rating service
 * - `web`: Router, handlers and HTML views
 * - `importer`: Catalog CSV import
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod auth;
pub mod database;
pub mod errors;
pub mod gateway;
pub mod importer;
pub mod session;
pub mod web;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use database::{Book, DatabaseConnection};
pub use errors::AppError;
pub use gateway::{RatingGateway, ReviewStatistics};
pub use web::{router, AppState};
