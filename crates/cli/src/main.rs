// Saldo CLI - per-municipality balance reconciliation

mod catalog;
mod exit_codes;
mod recon;
mod render;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use saldo_store::{open_store, SaldoConfig, Snapshot, StoreError};

use exit_codes::{store_exit_code, EXIT_CONFIG, EXIT_SUCCESS};
use util::municipality_arg;

#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "Reconcile municipal account balances across movement dates")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SALDO_GIT_HASH"), ")"))]
struct Cli {
    /// Config file (default: ./saldo.toml, then <config dir>/saldo/saldo.toml)
    #[arg(long, short = 'c', global = true, env = "SALDO_CONFIG")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug). SALDO_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List municipalities present in the store
    Municipalities {
        /// Output JSON instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// List movement dates recorded for a municipality
    #[command(after_help = "\
Examples:
  saldo dates Natal
  saldo dates Natal --json")]
    Dates {
        municipality: String,

        #[arg(long)]
        json: bool,
    },

    /// Compare the prior balance at the start of one date with the updated
    /// balance at the end of another
    #[command(after_help = "\
Examples:
  saldo compare Natal
  saldo compare Natal --from 2024-01-01 --to 2024-01-31
  saldo compare Natal --from 01/01/2024 --to 31/01/2024 --json")]
    Compare {
        municipality: String,

        /// Opening date (defaults to the municipality's first date)
        #[arg(long)]
        from: Option<String>,

        /// Closing date (defaults to the municipality's last date)
        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Per-day opening/closing balances and net movement, most recent first
    #[command(after_help = "\
Examples:
  saldo summary
  saldo summary --municipality Natal
  saldo summary --long --json
  saldo summary --output resumo.json")]
    Summary {
        /// Restrict to one municipality (default: all)
        #[arg(long, short = 'm')]
        municipality: Option<String>,

        /// One row per balance kind (opening/closing), for charting
        #[arg(long)]
        long: bool,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Loaded config plus the record snapshot every command works on.
pub(crate) struct Context {
    pub config: SaldoConfig,
    pub snapshot: Snapshot,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("SALDO_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_context(config_path: Option<PathBuf>) -> Result<Context, CliError> {
    let path = config_path.unwrap_or_else(SaldoConfig::default_path);

    let config = SaldoConfig::load(&path).map_err(|e| {
        let code = match e {
            StoreError::Io { .. } => EXIT_CONFIG,
            ref other => store_exit_code(other),
        };
        CliError::new(code, e.to_string()).with_hint("pass --config or create saldo.toml")
    })?;

    let store = open_store(&config.store)
        .map_err(|e| CliError::new(store_exit_code(&e), e.to_string()))?;
    tracing::info!(store = %store.describe(), "loading movements");

    let snapshot = store
        .load()
        .map_err(|e| CliError::new(store_exit_code(&e), e.to_string()))?;
    if !snapshot.skipped.is_empty() {
        tracing::warn!(
            skipped = snapshot.skipped.len(),
            "rows without municipality or with unparseable dates were left out"
        );
    }

    Ok(Context { config, snapshot })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = load_context(cli.config)?;

    match cli.command {
        Commands::Municipalities { json } => catalog::cmd_municipalities(&ctx, json),
        Commands::Dates { municipality, json } => {
            catalog::cmd_dates(&ctx, municipality_arg(municipality), json)
        }
        Commands::Compare { municipality, from, to, json } => {
            recon::cmd_compare(&ctx, municipality_arg(municipality), from, to, json)
        }
        Commands::Summary { municipality, long, json, output } => {
            let municipality = municipality.map(municipality_arg);
            recon::cmd_summary(&ctx, municipality, long, json, output)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
