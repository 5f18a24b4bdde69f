/*!
 * Tests for the rating service client against a local stub upstream
 */

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use bookreview::app_config::GatewayConfig;
use bookreview::errors::GatewayError;
use bookreview::gateway::{GoodreadsClient, RatingGateway};

const API_KEY: &str = "test-key";

#[derive(Deserialize)]
struct CountsQuery {
    key: String,
    isbns: String,
}

async fn review_counts(Query(query): Query<CountsQuery>) -> Response {
    if query.key != API_KEY {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }

    match query.isbns.as_str() {
        "0001" => Json(json!({
            "books": [{
                "id": 29207858,
                "isbn": "0001",
                "work_ratings_count": 26,
                "average_rating": "4.04"
            }]
        }))
        .into_response(),
        "broken" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "error" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"books": []})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "No books match those ISBNs.").into_response(),
    }
}

/// Serve the stub and return a client pointed at it
async fn stub_client(api_key: &str) -> GoodreadsClient {
    crate::common::init_logging();

    let app = Router::new().route("/book/review_counts.json", get(review_counts));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    GoodreadsClient::new(&GatewayConfig {
        endpoint: format!("http://{}/book/review_counts.json", address),
        api_key: api_key.to_string(),
        timeout_secs: 1,
    })
    .unwrap()
}

#[tokio::test]
async fn test_getStatistics_withKnownIsbn_shouldMapFields() {
    let client = stub_client(API_KEY).await;
    let stats = client.get_statistics("0001").await.unwrap();
    assert_eq!(stats.review_count, 26);
    assert!((stats.average_score - 4.04).abs() < 1e-9);
}

#[tokio::test]
async fn test_getStatistics_withUnknownIsbn_shouldBeNotFound() {
    let client = stub_client(API_KEY).await;
    let result = client.get_statistics("9999").await;
    assert!(matches!(result, Err(GatewayError::NotFound(isbn)) if isbn == "9999"));
}

#[tokio::test]
async fn test_getStatistics_withServerError_shouldBeApiError() {
    let client = stub_client(API_KEY).await;
    match client.get_statistics("error").await {
        Err(GatewayError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_getStatistics_withWrongKey_shouldBeApiError() {
    let client = stub_client("wrong").await;
    let result = client.get_statistics("0001").await;
    assert!(matches!(result, Err(GatewayError::ApiError { status_code: 401, .. })));
}

#[tokio::test]
async fn test_getStatistics_withUnexpectedBody_shouldBeParseError() {
    let client = stub_client(API_KEY).await;
    let result = client.get_statistics("broken").await;
    assert!(matches!(result, Err(GatewayError::ParseError(_))));
}

#[tokio::test]
async fn test_getStatistics_withSlowUpstream_shouldTimeOut() {
    let client = stub_client(API_KEY).await;
    let result = client.get_statistics("slow").await;
    assert!(matches!(result, Err(GatewayError::Timeout(_))));
}

#[tokio::test]
async fn test_getStatistics_withUnreachableHost_shouldFail() {
    // Bind and drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = GoodreadsClient::new(&GatewayConfig {
        endpoint: format!("http://{}/book/review_counts.json", address),
        api_key: API_KEY.to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    let result = client.get_statistics("0001").await;
    assert!(matches!(
        result,
        Err(GatewayError::RequestFailed(_)) | Err(GatewayError::Timeout(_))
    ));
}
