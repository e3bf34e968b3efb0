//! Client for the textbook repository's REST search API.
//!
//! [`CatalogueFetcher`] turns a [`SearchCriteria`] into one or more
//! sequential GET requests and concatenates every page into a single
//! [`AggregatedResult`]. The API never returns more than
//! [`MAX_PAGE_SIZE`] records per request.
//!
//! ```rust,no_run
//! use textbook_catalogue::catalogue::CatalogueFetcher;
//! use textbook_catalogue::models::SearchCriteria;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = CatalogueFetcher::new()?;
//! let result = fetcher.fetch(&SearchCriteria::subject("Biology")).await?;
//! println!("{} of {} records", result.len(), result.total_available);
//! # Ok(())
//! # }
//! ```

mod mock;
mod query;

pub use mock::{make_record, MockCatalogue};
pub use query::{build_search_url, filter_clause, title_case, SearchRequest};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CatalogueConfig;
use crate::models::{AggregatedResult, ResultPage, SearchCriteria, MAX_PAGE_SIZE};
use crate::utils::{default_user_agent, HttpClient, DEFAULT_TIMEOUT};

/// Root of the repository's REST API
pub const DEFAULT_BASE_URL: &str = "http://solr.bccampus.ca:8001/bcc/api/";

/// Anything that can answer a catalogue search.
///
/// Applications are written against this trait so a [`MockCatalogue`] can
/// stand in for the network.
#[async_trait]
pub trait Catalogue: Send + Sync + std::fmt::Debug {
    /// Human-readable name of the catalogue
    fn name(&self) -> &str;

    /// Run `criteria` to completion, returning every matching record
    async fn fetch(&self, criteria: &SearchCriteria) -> Result<AggregatedResult, FetchError>;
}

/// Errors that end a fetch. No partial results survive them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection failure, timeout or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body was not JSON or lacked an expected field
    #[error("Parse error: {0}")]
    Parse(String),

    /// The fetcher could not be set up
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(format!("JSON: {}", err))
    }
}

/// Fetches and aggregates search results from the repository API.
///
/// Holds no per-query state; one fetcher can serve any number of
/// independent [`fetch`](CatalogueFetcher::fetch) calls.
#[derive(Debug, Clone)]
pub struct CatalogueFetcher {
    client: Arc<HttpClient>,
    base_url: String,
}

impl CatalogueFetcher {
    /// Fetcher for the public repository with a 10 second request timeout
    pub fn new() -> Result<Self, FetchError> {
        let client = HttpClient::new()
            .map_err(|e| FetchError::InvalidRequest(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(Arc::new(client), DEFAULT_BASE_URL))
    }

    /// Fetcher built from configuration
    pub fn from_config(config: &CatalogueConfig) -> Result<Self, FetchError> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(default_user_agent());
        let timeout = match config.timeout_seconds {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        let client = HttpClient::with_settings(user_agent, timeout)
            .map_err(|e| FetchError::InvalidRequest(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(Arc::new(client), &config.base_url))
    }

    /// Fetcher sharing an existing client
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Point the fetcher at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API root requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `criteria` and collect every page of results.
    ///
    /// The first request asks for `min(page_size, 50)` records. Only when the
    /// server fills that page completely and reports more records available
    /// are further pages requested, `floor(available / length)` of them, each
    /// 50 records after the previous one.
    pub async fn fetch(&self, criteria: &SearchCriteria) -> Result<AggregatedResult, FetchError> {
        let request = SearchRequest::new(&self.base_url, criteria);

        let first = self
            .fetch_page(&request.url(0, criteria.effective_page_size()))
            .await?;

        let extra_pages = additional_pages(&first);
        let mut start = first.start;
        let length = first.length;
        let mut result = AggregatedResult::from_first_page(first);

        for _ in 0..extra_pages {
            start = start
                .checked_add(MAX_PAGE_SIZE)
                .ok_or_else(|| FetchError::Parse("start offset out of range".to_string()))?;
            let page = self.fetch_page(&request.url(start, length)).await?;
            result.extend(page);
        }

        tracing::info!(
            mode = ?criteria.mode,
            pages = extra_pages + 1,
            records = result.len(),
            available = result.total_available,
            "Catalogue search complete"
        );

        Ok(result)
    }

    async fn fetch_page(&self, url: &str) -> Result<ResultPage, FetchError> {
        tracing::debug!(url, "Requesting catalogue page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to query catalogue: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url, "Catalogue returned an error status");
            return Err(FetchError::Transport(format!(
                "Catalogue API returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Catalogue for CatalogueFetcher {
    fn name(&self) -> &str {
        "BCcampus Open Textbooks"
    }

    async fn fetch(&self, criteria: &SearchCriteria) -> Result<AggregatedResult, FetchError> {
        CatalogueFetcher::fetch(self, criteria).await
    }
}

/// Number of requests to issue after `first`.
///
/// A short first page means the result set is exhausted. Otherwise the count
/// is `floor(available / length)`, which can request one trailing empty page
/// when `available` is an exact multiple of the page size.
pub fn additional_pages(first: &ResultPage) -> usize {
    if first.length != MAX_PAGE_SIZE || first.available <= first.length {
        0
    } else {
        first.available / first.length
    }
}
