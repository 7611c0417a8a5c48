//! # Configuration Module
//!
//! Loads the workflow configuration from environment variables (and an optional
//! `.env` file). The resulting `Config` is built once at startup and handed to
//! the stage and collaborator constructors; nothing downstream reads the
//! environment itself.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SEARCH BACKEND
// =============================================================================
/// Which web search service backs the research stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchBackend {
    /// Tavily Search API (requires `TAVILY_API_KEY`)
    #[default]
    Tavily,
    /// DuckDuckGo HTML results (no key, URLs only)
    DuckDuckGo,
}

impl FromStr for SearchBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tavily" => Ok(SearchBackend::Tavily),
            "duckduckgo" | "ddg" => Ok(SearchBackend::DuckDuckGo),
            other => anyhow::bail!("Unknown search provider '{}' (expected tavily or duckduckgo)", other),
        }
    }
}

impl fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchBackend::Tavily => write!(f, "tavily"),
            SearchBackend::DuckDuckGo => write!(f, "duckduckgo"),
        }
    }
}

// =============================================================================
// CONFIGURATION STRUCT
// =============================================================================
/// Main configuration for the research workflow.
///
/// # Rust Concept: Plain Data Instead of Globals
///
/// The configuration is an ordinary struct passed by reference. Stages copy
/// the few values they need when they are constructed, so there is no hidden
/// global lookup while a query is running.
#[derive(Clone)]
pub struct Config {
    /// Completion model identifier (e.g., "gpt-4", "gpt-4o-mini")
    pub model: String,

    /// OpenAI API key; rig's client reads it from `OPENAI_API_KEY`
    pub openai_api_key: String,

    /// Tavily API key, required when `search_provider` is Tavily
    pub tavily_api_key: String,

    /// Search backend for the research stage
    pub search_provider: SearchBackend,

    /// Sampling temperature for search-query generation
    pub research_temperature: f64,

    /// Sampling temperature for answer drafting
    pub drafting_temperature: f64,

    /// How many search queries the research stage asks for
    pub num_search_queries: usize,

    /// Maximum hits requested per search query
    pub max_search_results_per_query: usize,

    /// Maximum sources rendered into the drafting prompt
    pub max_drafting_sources: usize,

    /// Character budget per source in the drafting prompt
    pub max_source_content_length: usize,

    /// Per-request timeout for the search provider
    pub search_timeout_secs: u64,

    /// Log level / filter directive for the application
    pub log_level: String,
}

/// Keys are redacted so configs can be logged.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("search_provider", &self.search_provider)
            .field("research_temperature", &self.research_temperature)
            .field("drafting_temperature", &self.drafting_temperature)
            .field("num_search_queries", &self.num_search_queries)
            .field("max_search_results_per_query", &self.max_search_results_per_query)
            .field("max_drafting_sources", &self.max_drafting_sources)
            .field("max_source_content_length", &self.max_source_content_length)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

// =============================================================================
// DEFAULT IMPLEMENTATION
// =============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            openai_api_key: String::new(),
            tavily_api_key: String::new(),
            search_provider: SearchBackend::Tavily,

            // Query planning should be focused; drafting a little looser
            research_temperature: 0.1,
            drafting_temperature: 0.2,

            num_search_queries: 3,
            max_search_results_per_query: 5,
            max_drafting_sources: 15,
            max_source_content_length: 500,
            search_timeout_secs: 30,

            log_level: "info".to_string(),
        }
    }
}

// =============================================================================
// CONFIGURATION LOADING
// =============================================================================
impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Example
    /// ```ignore
    /// let config = Config::from_env()?;
    /// println!("Using model: {}", config.model);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (silently ignore if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Rust Concept: Generic Closures
    ///
    /// Taking `impl Fn(&str) -> Option<String>` lets tests pass a map lookup
    /// instead of mutating the real process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(val) = lookup("DEFAULT_MODEL") {
            config.model = val;
        }

        if let Some(val) = lookup("OPENAI_API_KEY") {
            config.openai_api_key = val;
        }

        if let Some(val) = lookup("TAVILY_API_KEY") {
            config.tavily_api_key = val;
        }

        if let Some(val) = lookup("SEARCH_PROVIDER") {
            config.search_provider = val.parse()?;
        }

        if let Some(val) = lookup("RESEARCH_AGENT_TEMPERATURE") {
            config.research_temperature = val
                .parse()
                .context("RESEARCH_AGENT_TEMPERATURE must be a valid floating-point number (e.g., 0.1)")?;
        }

        if let Some(val) = lookup("DRAFTING_AGENT_TEMPERATURE") {
            config.drafting_temperature = val
                .parse()
                .context("DRAFTING_AGENT_TEMPERATURE must be a valid floating-point number (e.g., 0.2)")?;
        }

        if let Some(val) = lookup("NUM_SEARCH_QUERIES") {
            config.num_search_queries = val
                .parse()
                .context("NUM_SEARCH_QUERIES must be a valid positive integer")?;
        }

        if let Some(val) = lookup("MAX_SEARCH_RESULTS_PER_QUERY") {
            config.max_search_results_per_query = val
                .parse()
                .context("MAX_SEARCH_RESULTS_PER_QUERY must be a valid positive integer")?;
        }

        if let Some(val) = lookup("MAX_DRAFTING_SOURCES") {
            config.max_drafting_sources = val
                .parse()
                .context("MAX_DRAFTING_SOURCES must be a valid positive integer")?;
        }

        if let Some(val) = lookup("MAX_SOURCE_CONTENT_LENGTH") {
            config.max_source_content_length = val
                .parse()
                .context("MAX_SOURCE_CONTENT_LENGTH must be a valid positive integer")?;
        }

        if let Some(val) = lookup("SEARCH_TIMEOUT_SECS") {
            config.search_timeout_secs = val
                .parse()
                .context("SEARCH_TIMEOUT_SECS must be a valid positive integer")?;
        }

        if let Some(val) = lookup("LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.log_level = val;
        }

        Ok(config)
    }

    /// Validate the configuration before any collaborator is built.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("RESEARCH_AGENT_TEMPERATURE", self.research_temperature),
            ("DRAFTING_AGENT_TEMPERATURE", self.drafting_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                anyhow::bail!("{} must be between 0.0 and 2.0, got: {}", name, value);
            }
        }

        for (name, value) in [
            ("NUM_SEARCH_QUERIES", self.num_search_queries),
            ("MAX_SEARCH_RESULTS_PER_QUERY", self.max_search_results_per_query),
            ("MAX_DRAFTING_SOURCES", self.max_drafting_sources),
            ("MAX_SOURCE_CONTENT_LENGTH", self.max_source_content_length),
        ] {
            if value == 0 {
                anyhow::bail!("{} must be at least 1", name);
            }
        }

        if self.search_timeout_secs == 0 {
            anyhow::bail!("SEARCH_TIMEOUT_SECS must be at least 1");
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("DEFAULT_MODEL cannot be empty");
        }

        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set");
        }

        if self.search_provider == SearchBackend::Tavily && self.tavily_api_key.trim().is_empty() {
            anyhow::bail!("TAVILY_API_KEY is not set (or set SEARCH_PROVIDER=duckduckgo)");
        }

        Ok(())
    }
}
