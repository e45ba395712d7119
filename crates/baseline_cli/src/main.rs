//! BASELINE CLI
//!
//! Runs declarative reset scenarios against the in-memory store.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod scenario;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use scenario::Scenario;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "baseline")]
#[command(about = "BASELINE - reset store state to a captured baseline", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the final state
    Replay {
        /// Path to scenario file
        #[arg(short, long)]
        scenario: PathBuf,
        /// Write the final state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario and its reset options without running steps
    Check {
        /// Path to scenario file
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Replay { scenario, output } => {
            let outcome = Scenario::load(&scenario)?.run()?;
            tracing::info!(
                commits = outcome.commits,
                replacements = outcome.replacements,
                "scenario finished"
            );
            let rendered = serde_json::to_string_pretty(&outcome.state)?;
            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .wrap_err_with(|| format!("writing {}", path.display()))?,
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Commands::Check { scenario } => {
            let loaded = Scenario::load(&scenario)?;
            let (_, handle) = loaded.prepare()?;
            println!(
                "{}: ok (trigger '{}', {} steps)",
                scenario.display(),
                handle.trigger(),
                loaded.steps.len()
            );
            Ok(())
        }
    }
}
