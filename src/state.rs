//! Shared workflow state
//!
//! One `ResearchState` is created per query and threaded through the router
//! and stages until the workflow stops.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::workflow::StateSnapshot;

const NO_TITLE: &str = "No title";
const NO_CONTENT: &str = "No content";
const NO_URL: &str = "No URL";

/// A single search result as returned by the search collaborator.
///
/// Providers may omit any field, so all three are optional on the wire.
/// Use the accessors to read them with their placeholder defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            url: Some(url.into()),
        }
    }

    pub fn title(&self) -> &str {
        non_blank(&self.title).unwrap_or(NO_TITLE)
    }

    pub fn content(&self) -> &str {
        non_blank(&self.content).unwrap_or(NO_CONTENT)
    }

    pub fn url(&self) -> &str {
        non_blank(&self.url).unwrap_or(NO_URL)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// The hits returned for one generated search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub query: String,
    pub results: Vec<SearchHit>,
}

impl ResultGroup {
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            results,
        }
    }
}

/// Audit log entry. Never read by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateStep {
    pub agent_name: String,
    pub action: String,
    pub details: Value,
}

/// The state carried through one workflow run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchState {
    /// Original query; set at creation.
    query: String,

    /// Result groups in generation order.
    pub research_results: Vec<ResultGroup>,

    /// Synthesized answer, set by the drafting stage.
    pub final_answer: Option<String>,

    /// Error record from the first failing stage.
    error: Option<String>,

    /// Append-only log of stage actions.
    pub intermediate_steps: Vec<IntermediateStep>,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record a stage failure. The first recorded error wins.
    pub fn record_error(&mut self, record: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(record.into());
        }
    }

    pub fn add_intermediate_step(
        &mut self,
        agent_name: impl Into<String>,
        action: impl Into<String>,
        details: Value,
    ) {
        self.intermediate_steps.push(IntermediateStep {
            agent_name: agent_name.into(),
            action: action.into(),
            details,
        });
    }

    /// Total number of hits across all result groups.
    pub fn total_sources(&self) -> usize {
        self.research_results.iter().map(|g| g.results.len()).sum()
    }

    /// The generated search queries, in order.
    pub fn search_queries(&self) -> Vec<String> {
        self.research_results.iter().map(|g| g.query.clone()).collect()
    }

    /// Distinct URLs in first-seen order. Hits without a URL are skipped.
    pub fn unique_urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.research_results
            .iter()
            .flat_map(|g| g.results.iter())
            .filter_map(|hit| non_blank(&hit.url))
            .filter(|url| seen.insert(*url))
            .map(str::to_string)
            .collect()
    }

    /// Immutable view of the fields the router decides on.
    pub fn snapshot(&self) -> StateSnapshot<'_> {
        StateSnapshot {
            error: self.error.as_deref(),
            has_research: !self.research_results.is_empty(),
            has_answer: self.final_answer.is_some(),
        }
    }
}
