/*!
 * Client implementations for the external review-statistics service.
 *
 * - `goodreads`: HTTP client for a Goodreads-style `review_counts.json` endpoint
 * - `UnconfiguredGateway`: stand-in used when no API key is configured
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::GatewayError;

pub mod goodreads;

pub use goodreads::GoodreadsClient;

/// Aggregate statistics for one book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewStatistics {
    /// Number of ratings the service knows about
    pub review_count: u64,
    /// Mean score
    pub average_score: f64,
}

/// Common trait for rating services
///
/// Handlers hold an `Arc<dyn RatingGateway>` so tests can substitute a
/// canned implementation for the network client.
#[async_trait]
pub trait RatingGateway: Send + Sync + Debug {
    /// Fetch statistics for an ISBN.
    ///
    /// # Returns
    /// * `Result<ReviewStatistics, GatewayError>` - The statistics or a typed failure
    async fn get_statistics(&self, isbn: &str) -> Result<ReviewStatistics, GatewayError>;
}

/// Gateway used when the deployment has no API key
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGateway;

#[async_trait]
impl RatingGateway for UnconfiguredGateway {
    async fn get_statistics(&self, _isbn: &str) -> Result<ReviewStatistics, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
