//! Ranked API client
//!
//! Endpoints used:
//! - `GET {base}/matches/{id}` - one match with timelines and completions
//! - `GET {base}/users/{identifier}/matches?count=100` - first page of a
//!   player's matches, without timelines
//!
//! Both wrap the payload as `{"status": "...", "data": ...}`.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), mcsrflow::enrichment::FetchError> {
//! use mcsrflow::config::EngineConfig;
//! use mcsrflow::enrichment::RankedApiClient;
//!
//! let client = RankedApiClient::new(&EngineConfig::from_env())?;
//! let matches = client.fetch_user_matches("Feinberg").await?;
//! println!("{} matches", matches.len());
//! # Ok(())
//! # }
//! ```

use super::fetcher::{DetailFetcher, FetchError};
use crate::analytics::types::{Match, MatchDetail};
use crate::config::EngineConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_MATCHES_PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    status: Option<String>,
    data: Option<T>,
}

pub struct RankedApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl RankedApiClient {
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.api_base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.api_base, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|e| FetchError::Other(format!("invalid API key header: {}", e)))?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if let Some(status) = envelope.status.as_deref().filter(|s| *s != "success") {
            log::debug!("upstream status {} for {}", status, url);
        }
        envelope.data.ok_or_else(|| FetchError::MissingData(url.to_string()))
    }

    /// Fetch one match with its timeline events
    pub async fn fetch_match_detail(&self, match_id: &str) -> Result<MatchDetail, FetchError> {
        let url = self.endpoint(&["matches", match_id])?;
        self.get_data(url).await
    }

    /// Fetch the first page of a player's matches
    ///
    /// `identifier` may be a nickname, a player id or a Discord id.
    pub async fn fetch_user_matches(&self, identifier: &str) -> Result<Vec<Match>, FetchError> {
        let mut url = self.endpoint(&["users", identifier, "matches"])?;
        url.query_pairs_mut().append_pair("count", USER_MATCHES_PAGE_SIZE);

        let matches: Vec<Match> = self.get_data(url).await?;
        log::info!("Fetched {} matches for {}", matches.len(), identifier);
        Ok(matches)
    }
}

#[async_trait]
impl DetailFetcher for RankedApiClient {
    async fn fetch_detail(&self, match_id: &str) -> Result<MatchDetail, FetchError> {
        self.fetch_match_detail(match_id).await
    }

    fn source_name(&self) -> &'static str {
        "ranked-api"
    }
}
