//! # Error Module
//!
//! Typed errors for the workflow and its two external collaborators.
//!
//! Collaborator failures (`CompletionError`, `SearchError`) are wrapped into a
//! `StageError` at the stage boundary, rendered into a textual record with
//! [`format_error`] and stored on the state. Nothing here escapes the driver.

use std::error::Error as StdError;
use thiserror::Error;

/// Maximum number of `caused by:` lines kept in a formatted error record.
const MAX_TRACE_LINES: usize = 3;

// =============================================================================
// COLLABORATOR ERRORS
// =============================================================================

/// Failure reported by the completion collaborator.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion returned an empty response")]
    EmptyResponse,
}

/// Failure reported by the search collaborator.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to perform web search: {0}")]
    SearchFailed(String),

    #[error("Rate limited by search provider, please wait")]
    RateLimited,

    #[error("Unauthorized - check the search API key")]
    Unauthorized,

    #[error("Search request timed out")]
    Timeout,

    #[error("Search provider returned HTTP {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse search response: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

// =============================================================================
// STAGE ERRORS
// =============================================================================

/// Error raised inside a stage and converted into a state error record.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Search query generation failed")]
    Generation(#[source] CompletionError),

    #[error("Search query plan was not valid JSON: {0}")]
    MalformedPlan(#[source] serde_json::Error),

    #[error("Search query plan contained no queries")]
    EmptyPlan,

    #[error("Search for '{query}' failed")]
    Search {
        query: String,
        #[source]
        source: SearchError,
    },

    #[error("Answer synthesis failed")]
    Drafting(#[source] CompletionError),
}

impl StageError {
    /// Taxonomy name used in the error record.
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::Generation(_) | StageError::MalformedPlan(_) | StageError::EmptyPlan => {
                "GenerationError"
            }
            StageError::Search { .. } => "SearchError",
            StageError::Drafting(_) => "DraftingError",
        }
    }

    /// Render this error as a state error record.
    pub fn to_record(&self) -> String {
        format_error(self.kind(), self)
    }
}

// =============================================================================
// WORKFLOW ERRORS
// =============================================================================

/// Driver-level failures. These indicate a bug in a stage, not a collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl WorkflowError {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::InvariantViolation(_) => "WorkflowError",
        }
    }

    pub fn to_record(&self) -> String {
        format_error(self.kind(), self)
    }
}

/// Format an error as `"{kind}: {message}"` plus a short source-chain trace.
pub fn format_error(kind: &str, err: &(dyn StdError + 'static)) -> String {
    let mut record = format!("{}: {}", kind, err);

    let mut source = err.source();
    let mut lines = 0;
    while let Some(cause) = source {
        if lines == MAX_TRACE_LINES {
            break;
        }
        record.push_str(&format!("\n  caused by: {}", cause));
        lines += 1;
        source = cause.source();
    }

    record
}
