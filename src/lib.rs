//! # Research Workflow
//!
//! Routes a natural-language query through two stages:
//!
//! 1. **Research** - the model plans a few targeted web searches, which are
//!    run in order and collected as result groups.
//! 2. **Drafting** - the collected sources are trimmed into a bounded prompt
//!    and the model writes one cited answer.
//!
//! A pure router decides after every stage whether to research, draft or
//! stop; any recorded error stops the run immediately.
//!
//! ## Example
//! ```ignore
//! let config = Config::from_env()?;
//! let system = ResearchSystem::new(&config);
//! let report = system.process_query("What is new in Rust async?").await;
//! println!("{}", report.answer);
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod llm;
pub mod state;
pub mod system;
pub mod text;
pub mod tools;
pub mod workflow;

pub use agents::{DraftingAgent, ResearchAgent, Stage};
pub use config::{Config, SearchBackend};
pub use error::{CompletionError, SearchError, StageError, WorkflowError};
pub use llm::{CompletionProvider, OpenAIProvider};
pub use state::{IntermediateStep, ResearchState, ResultGroup, SearchHit};
pub use system::{QueryReport, ResearchSystem};
pub use tools::SearchProvider;
pub use workflow::{Decision, Phase, Workflow};
