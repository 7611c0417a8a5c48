//! # Workflow Module
//!
//! The driver loop: ask the router what to do, run that stage, repeat until
//! the router says stop.
//!
//! ```text
//!   start ──► route ──RunResearch──► research ──► route ──RunDraft──► draft ──► route ──► Stop
//!               │                                   │
//!               └────────── error set ──────────────┴──────────────► Stop
//! ```

mod router;

pub use router::{phase, route, Decision, Phase, StateSnapshot};

use tracing::{error, info, warn};

use crate::agents::Stage;
use crate::error::WorkflowError;
use crate::state::ResearchState;

/// Research then drafting: at most two stage runs per query.
const MAX_STAGE_INVOCATIONS: usize = 2;

/// Wires the two stages to the router.
pub struct Workflow {
    research: Box<dyn Stage>,
    drafting: Box<dyn Stage>,
}

impl Workflow {
    pub fn new(research: Box<dyn Stage>, drafting: Box<dyn Stage>) -> Self {
        Self { research, drafting }
    }

    /// Run a query to completion and return the terminal state.
    pub async fn run(&self, query: impl Into<String>) -> ResearchState {
        self.run_state(ResearchState::new(query)).await
    }

    /// Drive an existing state until the router stops.
    ///
    /// Never fails: stage errors are already on the state, and a stage that
    /// leaves the router pointing back at itself is recorded as an invariant
    /// violation.
    pub async fn run_state(&self, mut state: ResearchState) -> ResearchState {
        let mut invocations = 0;
        let mut last: Option<Decision> = None;

        loop {
            let current = phase(&state.snapshot());
            let decision = Decision::from(current);

            let stage = match decision {
                Decision::Stop => {
                    match current {
                        Phase::Failed => warn!(
                            error = state.error().unwrap_or_default(),
                            "Workflow encountered an error"
                        ),
                        _ => info!("Workflow complete"),
                    }
                    return state;
                }
                Decision::RunResearch => &self.research,
                Decision::RunDraft => &self.drafting,
            };

            if let Some(violation) = check_progress(last, decision, invocations) {
                error!(error = %violation, "Workflow stopped");
                state.record_error(violation.to_record());
                return state;
            }

            info!(stage = stage.name(), phase = %current, "Routing to stage");
            state = stage.process(state).await;
            invocations += 1;
            last = Some(decision);
        }
    }
}

/// A stage must move the state forward; it may not be chosen twice in a row,
/// and the loop never runs more than research plus draft.
fn check_progress(
    last: Option<Decision>,
    next: Decision,
    invocations: usize,
) -> Option<WorkflowError> {
    if last == Some(next) {
        return Some(WorkflowError::InvariantViolation(format!(
            "{:?} left the state unchanged and was selected again",
            next
        )));
    }
    if invocations >= MAX_STAGE_INVOCATIONS {
        return Some(WorkflowError::InvariantViolation(format!(
            "more than {} stage invocations",
            MAX_STAGE_INVOCATIONS
        )));
    }
    None
}
