//! ISMS Compliance CLI
//!
//! Renders the compliance dashboard from a snapshot of analysis results.
//!
//! # Usage
//!
//! ```bash
//! isms dashboard --input analyses.json --top 5
//! isms dashboard --input analyses.json --format json
//! isms analyze --docs isms-manual.txt --context "Cloud-hosted SaaS"
//! isms classify "No evidence of access reviews"
//! isms checklists
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use isms_compliance::{
    classify, BatchConfig, BatchRunner, DashboardEngine, EngineConfig, InMemoryResultStore,
    KeywordAnalysisService, SubmissionQueue,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

#[derive(Parser)]
#[command(name = "isms")]
#[command(version)]
#[command(about = "ISMS compliance dashboard", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, short, default_value = "text", global = true)]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard from a JSON array of analysis results
    Dashboard {
        #[arg(long, short, env = "ISMS_INPUT")]
        input: PathBuf,
        /// Number of top gaps to show
        #[arg(long, env = "ISMS_TOP_N")]
        top: Option<usize>,
        /// Engine config file (JSON)
        #[arg(long, env = "ISMS_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Analyze every catalogue checklist against a document by keyword coverage
    Analyze {
        /// Plain-text document to analyze
        #[arg(long, short)]
        docs: PathBuf,
        /// Additional context appended to the document
        #[arg(long, default_value = "")]
        context: String,
        /// Existing analysis snapshot to merge with (JSON)
        #[arg(long, env = "ISMS_INPUT")]
        input: Option<PathBuf>,
        /// Number of top gaps to show
        #[arg(long, env = "ISMS_TOP_N")]
        top: Option<usize>,
        /// Batch config file (JSON)
        #[arg(long, env = "ISMS_BATCH_CONFIG")]
        batch_config: Option<PathBuf>,
    },
    /// Classify a gap statement
    Classify { text: String },
    /// List the checklist catalogue
    Checklists,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard { input, top, config } => {
            let mut engine_config = match config {
                Some(path) => EngineConfig::load(&path)
                    .with_context(|| format!("loading engine config {}", path.display()))?,
                None => EngineConfig::default(),
            };
            if let Some(top) = top {
                engine_config.top_n = top;
            }

            let store = InMemoryResultStore::load(&input)
                .with_context(|| format!("reading analysis snapshot {}", input.display()))?;
            tracing::info!("Loaded {} analysis records from {}", store.count(), input.display());

            let view = DashboardEngine::new(engine_config).refresh(&store).await;
            cli.format.dashboard(&view)
        }
        Commands::Analyze { docs, context, input, top, batch_config } => {
            let documents = std::fs::read_to_string(&docs)
                .with_context(|| format!("reading document {}", docs.display()))?;
            let batch = match batch_config {
                Some(path) => BatchConfig::load(&path)
                    .with_context(|| format!("loading batch config {}", path.display()))?,
                None => BatchConfig::default(),
            };
            let store = match input {
                Some(path) => InMemoryResultStore::load(&path)
                    .with_context(|| format!("reading analysis snapshot {}", path.display()))?,
                None => InMemoryResultStore::new(),
            };

            let mut engine_config = EngineConfig::default();
            if let Some(top) = top {
                engine_config.top_n = top;
            }
            let engine = DashboardEngine::new(engine_config);

            let service = KeywordAnalysisService::with_catalogue(*engine.catalogue(), documents);
            let queue = SubmissionQueue::from_catalogue(
                engine.catalogue(),
                &context,
                &[docs.display().to_string()],
            );
            let outcomes = BatchRunner::new(Arc::new(service), batch).run_into(queue, &store).await;
            for failed in outcomes.iter().filter(|o| !o.success) {
                tracing::warn!(
                    checklist_id = failed.checklist_id,
                    error = failed.error.as_deref().unwrap_or("unknown"),
                    "Checklist was not analyzed"
                );
            }

            let view = engine.refresh(&store).await;
            cli.format.dashboard(&view)
        }
        Commands::Classify { text } => cli.format.priority(&text, classify(&text)),
        Commands::Checklists => {
            let engine = DashboardEngine::default();
            cli.format.checklists(engine.catalogue().all())
        }
    }
}
