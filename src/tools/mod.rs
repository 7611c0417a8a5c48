//! # Tools Module
//!
//! The search collaborator: a small async trait and two web implementations.
//!
//! - [`TavilySearch`]: the Tavily Search API (needs `TAVILY_API_KEY`)
//! - [`DuckDuckGoSearch`]: key-less HTML scraping fallback

mod duckduckgo;
mod tavily;

pub use duckduckgo::DuckDuckGoSearch;
pub use tavily::TavilySearch;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, SearchBackend};
use crate::error::SearchError;
use crate::state::SearchHit;

/// Query in, ranked hits out.
///
/// Implementations return at most `max_results` hits, best first.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Build the search provider selected in the configuration.
pub fn build_search_provider(config: &Config) -> Arc<dyn SearchProvider> {
    let timeout = Duration::from_secs(config.search_timeout_secs);
    match config.search_provider {
        SearchBackend::Tavily => {
            Arc::new(TavilySearch::new(config.tavily_api_key.clone()).with_timeout(timeout))
        }
        SearchBackend::DuckDuckGo => Arc::new(DuckDuckGoSearch::new().with_timeout(timeout)),
    }
}
