/*!
 * Tests for error types and conversions
 */

use bookreview::errors::{AppError, GatewayError, StoreError};

#[test]
fn test_gatewayError_apiError_shouldDisplayStatusAndMessage() {
    let error = GatewayError::ApiError {
        status_code: 503,
        message: "Service unavailable".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Service unavailable"));
}

#[test]
fn test_gatewayError_timeout_shouldDisplayCorrectly() {
    let display = GatewayError::Timeout("after 5s".to_string()).to_string();
    assert!(display.contains("timed out"));
    assert!(display.contains("after 5s"));
}

#[test]
fn test_storeError_duplicateReview_shouldNameUserAndBook() {
    let error = StoreError::DuplicateReview {
        username: "alice".to_string(),
        isbn: "0001".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("alice"));
    assert!(display.contains("0001"));
}

#[test]
fn test_storeError_fromAnyhow_shouldKeepContextChain() {
    let error: StoreError = anyhow::anyhow!("disk I/O error").context("Failed to insert").into();
    match error {
        StoreError::Database(message) => {
            assert!(message.contains("Failed to insert"));
            assert!(message.contains("disk I/O error"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_appError_fromGatewayError_shouldWrap() {
    let error: AppError = GatewayError::NotConfigured.into();
    assert!(matches!(error, AppError::Gateway(GatewayError::NotConfigured)));
}

#[test]
fn test_appError_config_shouldDisplayCause() {
    let display = AppError::Config("Database URL is required".into()).to_string();
    assert!(display.starts_with("Configuration error"));
    assert!(display.contains("Database URL is required"));
}

#[test]
fn test_appError_fromIoError_shouldBeUnknown() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "pipe closed");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::Unknown(ref m) if m.contains("pipe closed")));
}
