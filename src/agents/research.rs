//! Research stage: plan search queries with the model, then run them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::Stage;
use crate::config::Config;
use crate::error::StageError;
use crate::llm::CompletionProvider;
use crate::state::{ResearchState, ResultGroup};
use crate::text::extract_json_object;
use crate::tools::SearchProvider;

const AGENT_NAME: &str = "research_agent";

const QUERY_GENERATION_PROMPT: &str = r#"You are a research agent. Your goal is to gather comprehensive information about the following query:

QUERY: {query}

Based on this query, what are the top {num_search_queries} specific search queries you should make to gather
the most relevant and complete information? Be specific and targeted in your search queries.

Output should be in the following JSON format:
{
    "search_queries": [
        "specific search query 1",
        "specific search query 2",
        ...
    ],
    "reasoning": "Your reasoning for these search queries"
}

Respond with the JSON object only."#;

/// The model's search plan. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueryPlan {
    pub search_queries: Vec<String>,
    pub reasoning: String,
}

impl SearchQueryPlan {
    /// Parse and validate a completion.
    ///
    /// Blank queries are dropped; an empty plan is rejected and a longer plan
    /// is cut down to `limit` queries.
    pub fn parse(raw: &str, limit: usize) -> Result<Self, StageError> {
        let mut plan: SearchQueryPlan =
            serde_json::from_str(extract_json_object(raw)).map_err(StageError::MalformedPlan)?;

        plan.search_queries = plan
            .search_queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        if plan.search_queries.is_empty() {
            return Err(StageError::EmptyPlan);
        }
        if plan.search_queries.len() > limit {
            debug!(
                generated = plan.search_queries.len(),
                limit, "Dropping surplus search queries"
            );
            plan.search_queries.truncate(limit);
        }

        Ok(plan)
    }
}

/// Values the research stage takes from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResearchSettings {
    pub temperature: f64,
    pub num_search_queries: usize,
    pub max_results_per_query: usize,
}

impl From<&Config> for ResearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.research_temperature,
            num_search_queries: config.num_search_queries,
            max_results_per_query: config.max_search_results_per_query,
        }
    }
}

/// Generates targeted search queries and collects their results.
pub struct ResearchAgent {
    llm: Arc<dyn CompletionProvider>,
    search: Arc<dyn SearchProvider>,
    settings: ResearchSettings,
}

impl ResearchAgent {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
        settings: ResearchSettings,
    ) -> Self {
        Self {
            llm,
            search,
            settings,
        }
    }

    fn build_prompt(&self, query: &str) -> String {
        QUERY_GENERATION_PROMPT
            .replace("{num_search_queries}", &self.settings.num_search_queries.to_string())
            .replace("{query}", query)
    }

    async fn plan(&self, query: &str) -> Result<SearchQueryPlan, StageError> {
        let prompt = self.build_prompt(query);
        let raw = self
            .llm
            .complete(&prompt, self.settings.temperature)
            .await
            .map_err(StageError::Generation)?;
        debug!(response = %raw, "Query generation response");

        SearchQueryPlan::parse(&raw, self.settings.num_search_queries)
    }

    /// Run every planned query in order. The first failure aborts the lot.
    async fn gather(&self, plan: &SearchQueryPlan) -> Result<Vec<ResultGroup>, StageError> {
        let mut groups = Vec::with_capacity(plan.search_queries.len());

        for query in &plan.search_queries {
            info!(query = %query, provider = self.search.name(), "Executing search");
            let hits = self
                .search
                .search(query, self.settings.max_results_per_query)
                .await
                .map_err(|source| StageError::Search {
                    query: query.clone(),
                    source,
                })?;
            info!(query = %query, found = hits.len(), "Search completed");
            groups.push(ResultGroup::new(query.clone(), hits));
        }

        Ok(groups)
    }

    async fn run(&self, state: &mut ResearchState) -> Result<(), StageError> {
        let plan = self.plan(state.query()).await?;
        info!(count = plan.search_queries.len(), "Generated search queries");

        let groups = self.gather(&plan).await?;
        let total: usize = groups.iter().map(|g| g.results.len()).sum();
        let group_count = groups.len();

        state.research_results.extend(groups);
        state.add_intermediate_step(
            AGENT_NAME,
            "search",
            json!({
                "search_queries": plan.search_queries,
                "reasoning": plan.reasoning,
                "results_summary": format!("Found {} results from {} queries", total, group_count),
            }),
        );

        Ok(())
    }
}

#[async_trait]
impl Stage for ResearchAgent {
    fn name(&self) -> &'static str {
        AGENT_NAME
    }

    async fn process(&self, mut state: ResearchState) -> ResearchState {
        info!(query = %state.query(), "Research agent processing query");

        if let Err(e) = self.run(&mut state).await {
            error!(kind = e.kind(), error = %e, "Error in research agent");
            let record = e.to_record();
            state.record_error(format!("Research agent error: {}", record));
            state.add_intermediate_step(AGENT_NAME, "error", json!({ "error": record }));
        }

        state
    }
}
