//! ProofBench Control - evaluate proofs from the command line
//!
//! Exit status is 1 when a proof is invalid or an expression is rejected.

use anyhow::Result;
use clap::{Parser, Subcommand};
use proofbenchctl::commands::{self, EvaluateOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PROOFBENCH_LOG";

#[derive(Parser)]
#[command(name = "proofbenchctl")]
#[command(about = "ProofBench - hybrid symbolic and semantic proof evaluation", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a proof (JSON file)
    Evaluate {
        /// Proof file
        proof: PathBuf,

        /// Config file (defaults to ./proofbench.toml, then /etc/proofbench/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Store the result in this directory
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Analyze a justification graph (JSON list of nodes)
    Graph {
        nodes: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Check an expression against the sanitizer
    CheckExpr { expr: String },

    /// Print the effective configuration
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match cli.command {
        Commands::Evaluate { proof, config, json, store } => {
            let options = EvaluateOptions { config, json, store };
            commands::evaluate(&proof, &options).await?
        }
        Commands::Graph { nodes, json } => {
            commands::graph(&nodes, json)?;
            true
        }
        Commands::CheckExpr { expr } => commands::check_expr(&expr),
        Commands::Config { config } => {
            commands::show_config(config.as_deref())?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
