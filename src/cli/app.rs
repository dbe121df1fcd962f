//! Main CLI application structure

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::rank_cmd;
use crate::config::Config;
use crate::domain::{CycleCheck, Strategy};
use crate::engine::{ErrorResponse, RankError};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(author, version, about = "Score and rank tasks by priority")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to .taskrank.toml or the global config)
    #[arg(long, global = true, env = "TASKRANK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the request comes from and how to score it
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Request file (JSON); reads stdin when omitted or '-'
    pub file: Option<PathBuf>,

    /// Scoring strategy (overrides the request and the config)
    #[arg(long, short)]
    pub strategy: Option<Strategy>,

    /// Evaluation date as YYYY-MM-DD (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

impl RequestArgs {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every task and list them by priority
    Analyze {
        #[command(flatten)]
        request: RequestArgs,

        /// Cycle check to run before scoring
        #[arg(long)]
        cycle_check: Option<CycleCheck>,
    },

    /// Show the top tasks to work on next
    Suggest {
        #[command(flatten)]
        request: RequestArgs,

        /// Number of suggestions (defaults to the configured limit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show suggestions followed by the full ranking
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        /// Number of suggestions (defaults to the configured limit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Check a request for circular dependencies without scoring
    Check {
        /// Request file (JSON); reads stdin when omitted or '-'
        file: Option<PathBuf>,

        /// Cycle check to run (defaults to the configured check)
        #[arg(long)]
        cycle_check: Option<CycleCheck>,
    },

    /// List the available scoring strategies
    Strategies,
}

/// Installs the tracing subscriber; `--verbose` lowers the filter to debug
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore a subscriber installed by an embedding application
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(cli.format);
    output.verbose("taskrank starting");

    let config = Config::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Using {}", path.display())),
        None => output.verbose_ctx("config", "Using built-in defaults"),
    }

    let result = match cli.command {
        Commands::Analyze {
            request,
            cycle_check,
        } => rank_cmd::analyze(&output, &config, &request, cycle_check),
        Commands::Suggest { request, limit } => {
            rank_cmd::suggest(&output, &config, &request, limit)
        }
        Commands::Plan { request, limit } => rank_cmd::plan(&output, &config, &request, limit),
        Commands::Check { file, cycle_check } => {
            rank_cmd::check(&output, &config, file.as_deref(), cycle_check)
        }
        Commands::Strategies => {
            rank_cmd::strategies(&output, &config);
            Ok(())
        }
    };

    // Request-level failures are part of the JSON contract
    if let Err(e) = &result {
        if let Some(rank_err) = e.downcast_ref::<RankError>() {
            output.error_document(&ErrorResponse::from(rank_err));
        }
    }

    result?;
    output.verbose("Command completed successfully");
    Ok(())
}
