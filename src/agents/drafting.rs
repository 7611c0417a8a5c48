//! Drafting stage: turn the collected sources into one cited answer.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::Stage;
use crate::config::Config;
use crate::error::{CompletionError, StageError};
use crate::llm::CompletionProvider;
use crate::state::{ResearchState, SearchHit};
use crate::text::truncate_text;

const AGENT_NAME: &str = "drafting_agent";

/// Answer used when research produced no sources at all.
pub const NO_RESULTS_ANSWER: &str =
    "Unable to generate an answer as no research results were collected.";

const DRAFTING_PROMPT: &str = r#"You are an expert researcher and writer. Based on the original query and the research results,
create a comprehensive, well-structured response.

ORIGINAL QUERY: {query}

RESEARCH RESULTS:
{research_results}

Your task is to:
1. Synthesize the information from all sources
2. Organize it logically with clear section headings where appropriate
3. Present a clear, comprehensive answer to the original query
4. Cite specific sources where appropriate using [Source X] notation
5. Include a "Sources" section at the end that lists all the URLs used

Provide a thoughtful, nuanced response that thoroughly addresses the query.
If the research results are insufficient to properly answer the query, acknowledge this limitation
and suggest what additional information would be helpful."#;

/// Values the drafting stage takes from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftingSettings {
    pub temperature: f64,
    pub max_sources: usize,
    pub max_content_chars: usize,
}

impl From<&Config> for DraftingSettings {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.drafting_temperature,
            max_sources: config.max_drafting_sources,
            max_content_chars: config.max_source_content_length,
        }
    }
}

/// Synthesizes research results into the final answer.
pub struct DraftingAgent {
    llm: Arc<dyn CompletionProvider>,
    settings: DraftingSettings,
}

impl DraftingAgent {
    pub fn new(llm: Arc<dyn CompletionProvider>, settings: DraftingSettings) -> Self {
        Self { llm, settings }
    }

    /// The first `max_sources` hits in group-then-item order.
    fn select_sources<'a>(&self, state: &'a ResearchState) -> Vec<&'a SearchHit> {
        let all: Vec<&SearchHit> = state
            .research_results
            .iter()
            .flat_map(|group| group.results.iter())
            .collect();

        if all.len() > self.settings.max_sources {
            info!(
                from = all.len(),
                to = self.settings.max_sources,
                "Truncating sources for drafting"
            );
        }

        all.into_iter().take(self.settings.max_sources).collect()
    }

    /// Render sources as numbered blocks for the prompt.
    pub(crate) fn format_sources(&self, sources: &[&SearchHit]) -> String {
        sources
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "Source {}:\nTitle: {}\nContent: {}\nURL: {}\n\n",
                    i + 1,
                    hit.title(),
                    truncate_text(hit.content(), self.settings.max_content_chars),
                    hit.url()
                )
            })
            .collect()
    }

    fn build_prompt(&self, query: &str, formatted_sources: &str) -> String {
        // Sources go in last so their text is never rewritten.
        DRAFTING_PROMPT
            .replace("{query}", query)
            .replace("{research_results}", formatted_sources)
    }

    async fn run(&self, state: &mut ResearchState) -> Result<(), StageError> {
        let sources = self.select_sources(state);
        if sources.is_empty() {
            warn!("No research results to process");
            state.final_answer = Some(NO_RESULTS_ANSWER.to_string());
            return Ok(());
        }

        let source_count = sources.len();
        let prompt = self.build_prompt(state.query(), &self.format_sources(&sources));
        debug!(prompt_len = prompt.len(), sources = source_count, "Generating final answer");

        let answer = self
            .llm
            .complete(&prompt, self.settings.temperature)
            .await
            .map_err(StageError::Drafting)?;
        if answer.trim().is_empty() {
            return Err(StageError::Drafting(CompletionError::EmptyResponse));
        }

        let answer_length = answer.chars().count();
        info!(length = answer_length, "Final answer generated");
        state.final_answer = Some(answer);
        state.add_intermediate_step(
            AGENT_NAME,
            "synthesize",
            json!({
                "sources_used": source_count,
                "answer_length": answer_length,
            }),
        );

        Ok(())
    }
}

#[async_trait]
impl Stage for DraftingAgent {
    fn name(&self) -> &'static str {
        AGENT_NAME
    }

    async fn process(&self, mut state: ResearchState) -> ResearchState {
        info!("Drafting agent processing research results");

        if let Err(e) = self.run(&mut state).await {
            error!(kind = e.kind(), error = %e, "Error in drafting agent");
            let record = e.to_record();
            state.record_error(format!("Drafting agent error: {}", record));
            state.add_intermediate_step(AGENT_NAME, "error", json!({ "error": record }));
        }

        state
    }
}
