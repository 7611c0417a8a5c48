//! Tavily Search - web search through the Tavily Search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::SearchProvider;
use crate::error::SearchError;
use crate::state::SearchHit;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Default timeout for Tavily API requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tavily rejects larger result counts.
const MAX_RESULTS_LIMIT: usize = 20;

/// Request body for the `/search` endpoint
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
    include_answer: bool,
    include_raw_content: bool,
}

/// Response from the `/search` endpoint
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// Individual search result. Tavily may omit any of these.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl From<TavilyResult> for SearchHit {
    fn from(result: TavilyResult) -> Self {
        SearchHit {
            title: result.title,
            content: result.content,
            url: result.url,
        }
    }
}

/// Tavily Search client
///
/// # Example
/// ```ignore
/// let search = TavilySearch::new("tvly-...");
/// let hits = search.search("Rust async programming", 5).await?;
/// ```
pub struct TavilySearch {
    api_key: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set custom timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute(&self, request: &TavilyRequest<'_>) -> Result<TavilyResponse, SearchError> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, query = %request.query, "Sending Tavily request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Network(e)
                }
            })?;

        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SearchError::Parse(e.to_string()));
        }

        let error_text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(SearchError::Unauthorized),
            429 => Err(SearchError::RateLimited),
            code => Err(SearchError::Http(code, error_text)),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
        let request = TavilyRequest {
            query,
            max_results,
            search_depth: "basic",
            include_answer: false,
            include_raw_content: false,
        };

        let response = self.execute(&request).await?;
        let hits: Vec<SearchHit> = response
            .results
            .into_iter()
            .take(max_results)
            .map(SearchHit::from)
            .collect();

        if hits.is_empty() {
            warn!(query = %query, "No search results found");
        } else {
            info!(query = %query, count = hits.len(), "Search completed");
        }

        Ok(hits)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
