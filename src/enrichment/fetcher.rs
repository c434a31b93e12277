//! Fetcher trait for match detail records
//!
//! Defines the interface the coordinator pulls detail records through, so the
//! HTTP client can be swapped for a mock in tests.

use crate::analytics::types::MatchDetail;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("response for {0} had no data")]
    MissingData(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

/// Point-in-time lookup of one match's detail record
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_detail(&self, match_id: &str) -> Result<MatchDetail, FetchError>;

    /// Fetcher name for logging
    fn source_name(&self) -> &'static str;
}
