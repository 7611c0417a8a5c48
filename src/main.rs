//! # Research Workflow CLI
//!
//! Runs one query through the research and drafting stages and prints the
//! answer together with the search queries that were used.
//!
//! ## Quick Start
//! ```bash
//! cargo run -- --query "What are the latest developments in Rust?"
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use research_workflow::{Config, QueryReport, ResearchSystem};

/// Used when no `--query` is given.
const DEFAULT_QUERY: &str = "What are the latest advancements in quantum computing?";

/// Third-party crates are kept quiet unless they have something to warn about.
const QUIET_DEPENDENCIES: [&str; 3] = ["reqwest=warn", "hyper=warn", "rig=warn"];

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
/// # Rust Concept: Derive Macros with Clap
///
/// Clap's derive feature lets us define CLI arguments as a struct.
/// Every flag here is optional; the query falls back to a fixed default.
#[derive(Parser, Debug)]
#[command(
    name = "research-workflow",
    version,
    about = "Plans web searches for a question and drafts a cited answer from the results",
    long_about = r#"
Research Workflow - two-stage research with web search and an LLM.

The tool will:
  1. Ask the model for a few targeted search queries
  2. Run each query against the configured search provider
  3. Draft a structured answer that cites the sources it used

CONFIGURATION (environment or .env):
  OPENAI_API_KEY     required
  TAVILY_API_KEY     required unless SEARCH_PROVIDER=duckduckgo
  DEFAULT_MODEL      completion model (default: gpt-4)

EXAMPLES:
  research-workflow --query "What is new in Rust async?"
  research-workflow -m gpt-4o-mini --json -q "Rust web frameworks 2024"
"#
)]
struct Args {
    /// The research question to answer
    #[arg(short = 'q', long = "query", value_name = "QUERY")]
    query: Option<String>,

    /// The completion model to use (overrides DEFAULT_MODEL)
    #[arg(short = 'm', long = "model", env = "DEFAULT_MODEL")]
    model: Option<String>,

    /// Print the result as JSON instead of text
    #[arg(long = "json", default_value = "false")]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose", default_value = "false")]
    verbose: bool,
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
/// Startup problems (bad configuration, logging) exit non-zero.
/// Once the workflow runs, its errors are reported as text and the process
/// exits 0.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;

    if let Some(model) = args.model {
        config.model = model;
    }

    init_logging(&config.log_level, args.verbose)?;

    config.validate()?;

    info!(
        model = %config.model,
        search_provider = %config.search_provider,
        "Configuration loaded"
    );
    debug!(config = ?config, "Effective configuration");

    let system = ResearchSystem::new(&config);
    let query = args.query.unwrap_or_else(|| DEFAULT_QUERY.to_string());

    if !args.json {
        println!("Processing query: {}", query);
    }

    let report = system.process_query(&query).await;

    if let Some(error) = &report.error {
        warn!(error = %error, "Query finished with an error");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Print the report in the plain-text layout.
fn print_report(report: &QueryReport) {
    println!("\n{}", "=".repeat(60));
    println!("QUERY RESULT");
    println!("{}\n", "=".repeat(60));
    println!("Query: {}", report.query);
    println!("Answer: {}", report.answer);

    if let Some(error) = &report.error {
        println!("Error: {}", error);
    }

    println!("\n--- Research Statistics ---");
    println!("- Search queries used: {:?}", report.research_queries);
    println!("- Sources referenced: {}", report.sources_count);
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
/// Initialize the tracing subscriber for structured logging.
///
/// `level` is any `EnvFilter` directive ("info", "research_workflow=debug", ...).
/// `--verbose` forces debug.
fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let base = if verbose { "debug" } else { level };

    let mut filter = EnvFilter::try_new(base)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", base, e))?;
    for directive in QUIET_DEPENDENCIES {
        filter = filter.add_directive(directive.parse()?);
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
