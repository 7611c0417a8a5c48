//! DuckDuckGo search via HTML scraping.
//!
//! DuckDuckGo has no free web search API, so this reads the HTML results page.
//! Only URLs are reliable there; titles are the link's domain and content is
//! left unset (the state substitutes its placeholder).

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::SearchProvider;
use crate::error::SearchError;
use crate::state::SearchHit;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pause before each request; DuckDuckGo throttles rapid scrapers.
const REQUEST_DELAY_MS: u64 = 500;

pub struct DuckDuckGoSearch {
    timeout: Duration,
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let url = format!("{}?q={}", SEARCH_URL, urlencoding::encode(query));
        debug!(url = %url, "Fetching search results");

        let response = client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SearchError::RateLimited);
            }
            return Err(SearchError::SearchFailed(format!("HTTP {}", status)));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;

        let body = self.fetch(query).await?;
        let hits = parse_html(&body, max_results);

        if hits.is_empty() {
            warn!(query = %query, "No search results found");
        } else {
            info!(query = %query, count = hits.len(), "Search completed");
        }

        Ok(hits)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Extract result links from a DuckDuckGo HTML page.
///
/// Redirect links (`uddg=`) are read first, then visible `result__url`
/// anchors. URLs are de-duplicated and DuckDuckGo's own links skipped.
fn parse_html(html: &str, max_results: usize) -> Vec<SearchHit> {
    let mut urls: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    let mut push = |url: String, urls: &mut Vec<String>| {
        if url.contains("duckduckgo.com") || !seen.insert(url.clone()) {
            return;
        }
        urls.push(url);
    };

    for segment in html.split("uddg=").skip(1) {
        if urls.len() >= max_results {
            break;
        }
        let Some(end) = segment.find(|c| c == '&' || c == '"' || c == '\'') else {
            continue;
        };
        if let Ok(url) = urlencoding::decode(&segment[..end]) {
            if url.starts_with("http") {
                push(url.into_owned(), &mut urls);
            }
        }
    }

    for segment in html.split("result__url").skip(1) {
        if urls.len() >= max_results {
            break;
        }
        let Some(href_start) = segment.find("href=\"") else {
            continue;
        };
        let after_href = &segment[href_start + 6..];
        let Some(href_end) = after_href.find('"') else {
            continue;
        };
        let href = &after_href[..href_end];
        let url = if let Some(rest) = href.strip_prefix("//") {
            format!("https://{}", rest)
        } else if href.starts_with("http") {
            href.to_string()
        } else {
            continue;
        };
        push(url, &mut urls);
    }

    urls.into_iter()
        .take(max_results)
        .map(|url| SearchHit {
            title: extract_domain(&url),
            content: None,
            url: Some(url),
        })
        .collect()
}

/// Extract the domain name from a URL.
fn extract_domain(url: &str) -> Option<String> {
    url.split("//")
        .nth(1)?
        .split('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2Flearn&amp;rut=abc">Learn Rust</a>
        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&amp;rut=def">The Book</a>
        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2Flearn&amp;rut=ghi">Duplicate</a>
        <a class="result__url" href="//blog.rust-lang.org/2024/">blog.rust-lang.org</a>
        <a class="result__url" href="https://duckduckgo.com/settings">settings</a>
    "#;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.example.com/page"),
            Some("www.example.com".to_string())
        );
        assert_eq!(
            extract_domain("https://rust-lang.org/learn"),
            Some("rust-lang.org".to_string())
        );
        assert_eq!(extract_domain("not a url"), None);
    }

    #[test]
    fn test_parse_html_collects_unique_urls_in_order() {
        let hits = parse_html(SAMPLE_HTML, 10);
        let urls: Vec<&str> = hits.iter().map(|h| h.url()).collect();

        assert_eq!(
            urls,
            vec![
                "https://www.rust-lang.org/learn",
                "https://doc.rust-lang.org/book/",
                "https://blog.rust-lang.org/2024/",
            ]
        );
        assert_eq!(hits[0].title(), "www.rust-lang.org");
        assert_eq!(hits[0].content(), "No content");
    }

    #[test]
    fn test_parse_html_respects_max_results() {
        assert_eq!(parse_html(SAMPLE_HTML, 2).len(), 2);
    }

    #[test]
    fn test_parse_html_empty_page() {
        assert!(parse_html("<html><body>No results.</body></html>", 5).is_empty());
    }
}
