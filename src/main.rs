mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mnemo::config::MnemoConfig;

#[derive(Parser)]
#[command(name = "mnemo", version, about = "Semantic memory engine for personal AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wipe and rebuild the index from all source files and the journal log
    Rebuild,
    /// Incrementally index one source file
    Index {
        /// Path to the markdown file
        path: String,
        /// Content type: state, project, person, meeting, or topic
        #[arg(long = "type")]
        item_type: String,
    },
    /// Search the index by meaning
    Search {
        query: String,
        /// Maximum number of primary results
        #[arg(long)]
        limit: Option<usize>,
        /// Restrict results to one type
        #[arg(long = "type")]
        item_type: Option<String>,
        /// Timestamp lower bound (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
        /// Skip relatedness expansion
        #[arg(long)]
        no_related: bool,
    },
    /// Show one indexed item and its neighborhood
    Show { id: String },
    /// Append a journal entry and index it
    Log {
        topic: String,
        content: String,
        #[arg(long)]
        intent: Option<String>,
    },
    /// Display index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MnemoConfig::load()?;

    // Log to stderr so stdout stays clean for piped output.
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Rebuild => cli::rebuild::run(&config).await?,
        Command::Index { path, item_type } => {
            cli::index::run(&config, &path, &item_type).await?;
        }
        Command::Search {
            query,
            limit,
            item_type,
            since,
            no_related,
        } => {
            cli::search::run(
                &config,
                &query,
                limit,
                item_type.as_deref(),
                since.as_deref(),
                no_related,
            )
            .await?;
        }
        Command::Show { id } => cli::show::run(&config, &id).await?,
        Command::Log {
            topic,
            content,
            intent,
        } => cli::log::run(&config, &topic, &content, intent).await?,
        Command::Stats => cli::stats::run(&config)?,
    }

    Ok(())
}
