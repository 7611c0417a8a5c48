//! Routing decisions derived from the state.
//!
//! The router never stores a phase. Each call recomputes it from three
//! fields: error, research presence, answer presence.

use std::fmt;

/// Immutable view of the fields the router reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot<'a> {
    pub error: Option<&'a str>,
    pub has_research: bool,
    pub has_answer: bool,
}

/// Where the workflow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NeedsResearch,
    NeedsDraft,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NeedsResearch => "needs_research",
            Phase::NeedsDraft => "needs_draft",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What the driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    RunResearch,
    RunDraft,
    Stop,
}

impl From<Phase> for Decision {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::NeedsResearch => Decision::RunResearch,
            Phase::NeedsDraft => Decision::RunDraft,
            Phase::Done | Phase::Failed => Decision::Stop,
        }
    }
}

/// Classify a snapshot. Checks run in priority order: error first.
pub fn phase(snapshot: &StateSnapshot<'_>) -> Phase {
    if snapshot.error.is_some() {
        Phase::Failed
    } else if !snapshot.has_research {
        Phase::NeedsResearch
    } else if !snapshot.has_answer {
        Phase::NeedsDraft
    } else {
        Phase::Done
    }
}

/// Pick the next step for a snapshot.
pub fn route(snapshot: &StateSnapshot<'_>) -> Decision {
    phase(snapshot).into()
}
