mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use opsdeck::config::OpsdeckConfig;
use opsdeck::store::types::Schedule;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opsdeck", version, about = "Mission-control data hub for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP hub
    Serve,
    /// Post one activity event to a running hub (fire-and-forget)
    Log {
        #[arg(long)]
        action: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 0)]
        duration_ms: i64,
        #[arg(long)]
        tokens: Option<i64>,
        #[arg(long)]
        cost: Option<f64>,
        /// completed, failed, or in_progress
        #[arg(long, default_value = "completed")]
        status: String,
        /// Extra context as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Index files into the store
    Index {
        #[command(subcommand)]
        target: IndexTarget,
    },
    /// Mirror a scheduled task into the store
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Print activity stats for a trailing window
    Stats {
        #[arg(long, default_value_t = 24)]
        last_hours: i64,
    },
    /// Search memories and documents
    Search { query: String },
    /// Load the illustrative sample dataset into the store
    Seed,
}

#[derive(Subcommand)]
enum IndexTarget {
    /// Index a memory file
    Memory {
        file: PathBuf,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Index a project document
    Doc {
        file: PathBuf,
        #[arg(long)]
        doc_type: String,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Create or refresh a task (a task id is generated when omitted)
    Add {
        #[arg(long)]
        task_id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Cron expression (e.g. "30 7 * * *")
        #[arg(long)]
        cron: Option<String>,
        /// Recurring interval in milliseconds
        #[arg(long)]
        every_ms: Option<i64>,
        /// One-shot fire time, epoch milliseconds
        #[arg(long)]
        at_ms: Option<i64>,
        /// Next expected fire time, epoch milliseconds
        #[arg(long)]
        next_run: i64,
        #[arg(long)]
        model: Option<String>,
        /// Mirror the task as disabled
        #[arg(long)]
        disabled: bool,
    },
    /// List tasks, soonest first
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level and paths)
    let config = OpsdeckConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            opsdeck::server::serve(config).await?;
        }
        Command::Log {
            action,
            description,
            duration_ms,
            tokens,
            cost,
            status,
            metadata,
        } => {
            cli::log::run(
                &config,
                &action,
                &description,
                duration_ms,
                tokens,
                cost,
                &status,
                metadata.as_deref(),
            )
            .await?;
        }
        Command::Index { target } => match target {
            IndexTarget::Memory { file, tags } => {
                cli::index::memory(&config, &file, &tags)?;
            }
            IndexTarget::Doc { file, doc_type } => {
                cli::index::document(&config, &file, &doc_type)?;
            }
        },
        Command::Task { action } => match action {
            TaskAction::Add {
                task_id,
                name,
                description,
                cron,
                every_ms,
                at_ms,
                next_run,
                model,
                disabled,
            } => {
                let schedule = match (cron, every_ms, at_ms) {
                    (Some(expr), None, None) => Schedule::Cron { expr },
                    (None, Some(every_ms), None) => Schedule::Every { every_ms },
                    (None, None, Some(at_ms)) => Schedule::At { at_ms },
                    _ => anyhow::bail!("specify exactly one of --cron, --every-ms, --at-ms"),
                };
                cli::task::add(
                    &config, task_id, name, description, schedule, next_run, model, !disabled,
                )?;
            }
            TaskAction::List => {
                cli::task::list(&config)?;
            }
        },
        Command::Stats { last_hours } => {
            cli::stats::run(&config, last_hours)?;
        }
        Command::Search { query } => {
            cli::search::run(&config, &query)?;
        }
        Command::Seed => {
            cli::seed::run(&config)?;
        }
    }

    Ok(())
}
