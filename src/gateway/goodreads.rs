use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{RatingGateway, ReviewStatistics};
use crate::app_config::GatewayConfig;
use crate::errors::GatewayError;

/// Client for a Goodreads-style review statistics API
#[derive(Debug, Clone)]
pub struct GoodreadsClient {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Full URL of the `review_counts.json` endpoint
    endpoint: Url,
}

/// Envelope returned by the statistics endpoint
#[derive(Debug, Deserialize)]
pub struct ReviewCountsResponse {
    /// One entry per requested ISBN
    pub books: Vec<BookReviewCounts>,
}

/// Per-book counters
#[derive(Debug, Deserialize)]
pub struct BookReviewCounts {
    /// ISBN the entry describes
    #[serde(default)]
    pub isbn: Option<String>,
    /// Ratings across every edition of the work
    pub work_ratings_count: u64,
    /// Mean rating; the service sends it as a string
    pub average_rating: NumberOrString,
}

/// A number that may arrive quoted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl GoodreadsClient {
    /// Create a new client from the gateway settings
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| GatewayError::RequestFailed(format!("Invalid endpoint {}: {}", config.endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
        })
    }

    fn request_url(&self, isbn: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("isbns", isbn);
        url
    }

    /// Convert the service envelope into statistics
    pub fn statistics_from_response(
        response: &ReviewCountsResponse,
    ) -> Result<ReviewStatistics, GatewayError> {
        let book = response
            .books
            .first()
            .ok_or_else(|| GatewayError::ParseError("Response contains no books".to_string()))?;

        let average_score = book.average_rating.as_f64().ok_or_else(|| {
            GatewayError::ParseError(format!("Invalid average rating: {:?}", book.average_rating))
        })?;

        Ok(ReviewStatistics {
            review_count: book.work_ratings_count,
            average_score,
        })
    }
}

#[async_trait]
impl RatingGateway for GoodreadsClient {
    async fn get_statistics(&self, isbn: &str) -> Result<ReviewStatistics, GatewayError> {
        let url = self.request_url(isbn);
        debug!("Fetching review statistics for {}", isbn);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(isbn.to_string()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            warn!("Rating service error ({}) for {}: {}", status, isbn, message);
            return Err(GatewayError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.json::<ReviewCountsResponse>().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(e.to_string())
            } else {
                GatewayError::ParseError(e.to_string())
            }
        })?;

        Self::statistics_from_response(&body)
    }
}
