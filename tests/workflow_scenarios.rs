//! End-to-end runs of the research workflow with scripted collaborators.

mod common;

use common::{plan_json, sample_answer, test_config, NumberedSearch, ScriptedCompletion};
use research_workflow::agents::NO_RESULTS_ANSWER;
use research_workflow::workflow::{route, Decision};
use research_workflow::{Config, ResearchSystem};

fn system(config: &Config, llm: std::sync::Arc<ScriptedCompletion>, search: std::sync::Arc<NumberedSearch>) -> ResearchSystem {
    ResearchSystem::with_providers(config, llm, search)
}

#[tokio::test]
async fn test_full_run_collects_groups_and_answers() {
    let llm = ScriptedCompletion::planning(&["query one", "query two", "query three"]);
    let search = NumberedSearch::new(2);
    let system = system(&test_config(), llm.clone(), search.clone());

    let state = system.run("X").await;

    assert_eq!(state.research_results.len(), 3);
    assert_eq!(state.total_sources(), 6);
    assert_eq!(state.final_answer.as_deref(), Some(sample_answer().as_str()));
    assert!(state.error().is_none());
    assert!(state.intermediate_steps.len() >= 2);
    assert_eq!(search.queries(), vec!["query one", "query two", "query three"]);
    assert_eq!(llm.prompts().len(), 2);
}

#[tokio::test]
async fn test_generation_failure_stops_before_drafting() {
    let llm = ScriptedCompletion::new(Err("model unavailable".to_string()), Ok(sample_answer()));
    let search = NumberedSearch::new(2);
    let system = system(&test_config(), llm.clone(), search.clone());

    let state = system.run("X").await;

    assert!(state.research_results.is_empty());
    assert!(state.final_answer.is_none());
    let error = state.error().unwrap();
    assert!(error.contains("GenerationError"));
    assert!(error.contains("model unavailable"));
    assert!(search.queries().is_empty());
    assert!(llm.drafting_prompt().is_none());
}

#[tokio::test]
async fn test_malformed_plan_is_a_generation_error() {
    let llm = ScriptedCompletion::new(
        Ok("I would search for quantum computing news.".to_string()),
        Ok(sample_answer()),
    );
    let system = system(&test_config(), llm, NumberedSearch::new(2));

    let state = system.run("X").await;

    assert!(state.error().unwrap().contains("GenerationError"));
    assert!(state.research_results.is_empty());
    assert!(state.final_answer.is_none());
}

#[tokio::test]
async fn test_search_failure_stops_workflow() {
    let llm = ScriptedCompletion::planning(&["a", "b"]);
    let search = NumberedSearch::failing();
    let system = system(&test_config(), llm.clone(), search.clone());

    let state = system.run("X").await;

    assert!(state.research_results.is_empty());
    assert!(state.final_answer.is_none());
    assert!(state.error().unwrap().contains("SearchError"));
    assert_eq!(search.queries(), vec!["a"]);
    assert!(llm.drafting_prompt().is_none());
}

#[tokio::test]
async fn test_empty_search_results_fall_back() {
    let llm = ScriptedCompletion::planning(&["a", "b", "c"]);
    let system = system(&test_config(), llm.clone(), NumberedSearch::new(0));

    let state = system.run("X").await;

    assert!(state.error().is_none());
    assert_eq!(state.research_results.len(), 3);
    assert_eq!(state.final_answer.as_deref(), Some(NO_RESULTS_ANSWER));
    assert!(NO_RESULTS_ANSWER.contains("no research results"));
    assert!(llm.drafting_prompt().is_none());
}

#[tokio::test]
async fn test_drafting_failure_keeps_research() {
    let llm = ScriptedCompletion::new(Ok(plan_json(&["a"])), Err("context length exceeded".to_string()));
    let system = system(&test_config(), llm, NumberedSearch::new(3));

    let state = system.run("X").await;

    assert_eq!(state.total_sources(), 3);
    assert!(state.final_answer.is_none());
    let error = state.error().unwrap();
    assert!(error.starts_with("Drafting agent error: DraftingError"));
    assert!(error.contains("context length exceeded"));
}

#[tokio::test]
async fn test_drafting_context_keeps_first_sources_only() {
    let config = Config {
        num_search_queries: 4,
        max_search_results_per_query: 5,
        max_drafting_sources: 15,
        ..test_config()
    };
    let llm = ScriptedCompletion::planning(&["a", "b", "c", "d"]);
    let system = system(&config, llm.clone(), NumberedSearch::new(5));

    let state = system.run("X").await;
    assert_eq!(state.total_sources(), 20);

    let prompt = llm.drafting_prompt().expect("drafting prompt sent");
    for id in 1..=15 {
        assert!(
            prompt.contains(&format!("URL: https://example.com/source-{}\n", id)),
            "source {} missing from prompt",
            id
        );
    }
    for id in 16..=20 {
        assert!(
            !prompt.contains(&format!("URL: https://example.com/source-{}\n", id)),
            "source {} should have been dropped",
            id
        );
    }
    assert!(prompt.contains("Source 15:\n"));
    assert!(!prompt.contains("Source 16:\n"));
}

#[tokio::test]
async fn test_source_content_is_truncated_in_prompt() {
    let config = Config {
        max_source_content_length: 30,
        ..test_config()
    };
    let llm = ScriptedCompletion::planning(&["a"]);
    let system = system(&config, llm.clone(), NumberedSearch::new(1));

    system.run("X").await;

    let prompt = llm.drafting_prompt().unwrap();
    assert!(prompt.contains("Content: Content of source 1....\n"));
    assert!(!prompt.contains("It has two sentences."));
}

#[tokio::test]
async fn test_every_run_ends_with_answer_or_error() {
    let cases = vec![
        ScriptedCompletion::planning(&["a"]),
        ScriptedCompletion::new(Err("down".to_string()), Ok(sample_answer())),
        ScriptedCompletion::new(Ok(plan_json(&["a"])), Err("down".to_string())),
    ];

    for llm in cases {
        let system = system(&test_config(), llm, NumberedSearch::new(1));
        let state = system.run("some question").await;

        assert!(
            state.final_answer.is_some() ^ state.error().is_some(),
            "exactly one of answer / error must be set"
        );
        assert_eq!(route(&state.snapshot()), Decision::Stop);
    }
}

#[tokio::test]
async fn test_process_query_report() {
    let llm = ScriptedCompletion::planning(&["a", "b"]);
    let system = system(&test_config(), llm, NumberedSearch::new(2));

    let report = system.process_query("What is new?").await;

    assert_eq!(report.query, "What is new?");
    assert_eq!(report.answer, sample_answer());
    assert!(report.error.is_none());
    assert_eq!(report.research_queries, vec!["a", "b"]);
    assert_eq!(report.sources_count, 4);
    assert_eq!(report.sources.len(), 4);
}
