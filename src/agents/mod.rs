//! # Agents Module
//!
//! The two workflow stages. Each takes the state, does its work against the
//! external collaborators, and hands the state back. Failures are recorded on
//! the state; a stage never returns an error to the driver.

mod drafting;
mod research;

pub use drafting::{DraftingAgent, DraftingSettings, NO_RESULTS_ANSWER};
pub use research::{ResearchAgent, ResearchSettings, SearchQueryPlan};

use async_trait::async_trait;

use crate::state::ResearchState;

/// One discrete unit of work in the workflow.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Name used in the audit log and tracing output.
    fn name(&self) -> &'static str;

    /// Run the stage. The returned state carries its output or its error.
    async fn process(&self, state: ResearchState) -> ResearchState;
}
