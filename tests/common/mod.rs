//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use research_workflow::{CompletionError, CompletionProvider, Config, SearchError, SearchHit, SearchProvider};

/// Marker that only appears in the drafting prompt.
const DRAFTING_MARKER: &str = "ORIGINAL QUERY:";

/// Answers the planning prompt with `plan` and the drafting prompt with `answer`.
pub struct ScriptedCompletion {
    plan: Result<String, String>,
    answer: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(plan: Result<String, String>, answer: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            plan,
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// A well-formed plan for `queries` and a fixed cited answer.
    pub fn planning(queries: &[&str]) -> Arc<Self> {
        Self::new(Ok(plan_json(queries)), Ok(sample_answer()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn drafting_prompt(&self) -> Option<String> {
        self.prompts()
            .into_iter()
            .find(|p| p.contains(DRAFTING_MARKER))
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, prompt: &str, _temperature: f64) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = if prompt.contains(DRAFTING_MARKER) {
            &self.answer
        } else {
            &self.plan
        };
        reply.clone().map_err(CompletionError::Request)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Returns `per_query` hits for every query, numbered across the whole run.
pub struct NumberedSearch {
    per_query: usize,
    fail: bool,
    next_id: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl NumberedSearch {
    pub fn new(per_query: usize) -> Arc<Self> {
        Arc::new(Self {
            per_query,
            fail: false,
            next_id: AtomicUsize::new(1),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            per_query: 0,
            fail: true,
            next_id: AtomicUsize::new(1),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for NumberedSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Http(500, "search backend down".to_string()));
        }

        Ok((0..self.per_query.min(max_results))
            .map(|_| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                SearchHit::new(
                    format!("Source title {}", id),
                    format!("Content of source {}. It has two sentences.", id),
                    format!("https://example.com/source-{}", id),
                )
            })
            .collect())
    }

    fn name(&self) -> &str {
        "numbered"
    }
}

pub fn plan_json(queries: &[&str]) -> String {
    serde_json::json!({
        "search_queries": queries,
        "reasoning": "Cover the topic from several angles"
    })
    .to_string()
}

pub fn sample_answer() -> String {
    "## Overview\nQuantum computers are improving [Source 1].\n\n## Sources\n- https://example.com/source-1"
        .to_string()
}

/// Defaults with dummy keys.
pub fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        tavily_api_key: "tvly-test".to_string(),
        ..Config::default()
    }
}
