//! Query processing facade used by the binary.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::agents::{DraftingAgent, ResearchAgent};
use crate::config::Config;
use crate::llm::{CompletionProvider, OpenAIProvider};
use crate::state::ResearchState;
use crate::tools::{build_search_provider, SearchProvider};
use crate::workflow::Workflow;

/// Answer reported when the workflow stopped without one.
pub const NO_ANSWER: &str = "Unable to generate an answer.";

/// What a caller gets back for one query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub query: String,
    pub answer: String,
    pub error: Option<String>,
    pub research_queries: Vec<String>,
    pub sources_count: usize,
    pub sources: Vec<String>,
}

impl From<&ResearchState> for QueryReport {
    fn from(state: &ResearchState) -> Self {
        Self {
            query: state.query().to_string(),
            answer: state
                .final_answer
                .clone()
                .unwrap_or_else(|| NO_ANSWER.to_string()),
            error: state.error().map(str::to_string),
            research_queries: state.search_queries(),
            sources_count: state.total_sources(),
            sources: state.unique_urls(),
        }
    }
}

/// The research system: a workflow plus query bookkeeping.
pub struct ResearchSystem {
    workflow: Workflow,
}

impl ResearchSystem {
    /// Build the system with the OpenAI completion client and the configured
    /// search provider. Keys come from `config` only.
    pub fn new(config: &Config) -> Self {
        let llm: Arc<dyn CompletionProvider> =
            Arc::new(OpenAIProvider::new(&config.openai_api_key, &config.model));
        let search = build_search_provider(config);
        Self::with_providers(config, llm, search)
    }

    /// Build the system around caller-supplied collaborators.
    pub fn with_providers(
        config: &Config,
        llm: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let research = ResearchAgent::new(llm.clone(), search, config.into());
        let drafting = DraftingAgent::new(llm, config.into());
        Self::with_workflow(Workflow::new(Box::new(research), Box::new(drafting)))
    }

    pub fn with_workflow(workflow: Workflow) -> Self {
        Self { workflow }
    }

    /// Run one query and return the full terminal state.
    pub async fn run(&self, query: &str) -> ResearchState {
        info!(query = %query, "Processing query");
        self.workflow.run(query).await
    }

    /// Run one query and summarize the outcome.
    pub async fn process_query(&self, query: &str) -> QueryReport {
        let state = self.run(query).await;
        let report = QueryReport::from(&state);

        if report.error.is_none() {
            let preview: String = query.chars().take(50).collect();
            info!(query = %preview, sources = report.sources_count, "Query processed successfully");
        }

        report
    }
}
