//! # Second Brain CLI (`brain`)
//!
//! ## Usage
//!
//! ```bash
//! brain --config ./config/brain.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `brain init` | Create the SQLite database and schema |
//! | `brain sources` | Show the configured journal source and its health |
//! | `brain sync` | Ingest journals newer than the stored watermark |
//! | `brain atomize <file>` | Preview how a markdown file is split into thoughts |
//! | `brain stats` | Show the PARA breakdown of stored thoughts |

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use second_brain::{config, ingest, migrate, preview, sources, stats};
use second_brain_core::sync::SyncOptions;

/// Second Brain CLI — turn journal issues into tagged, deduplicated
/// atomic thoughts.
#[derive(Parser)]
#[command(
    name = "brain",
    about = "Second Brain — incremental journal atomization into a PARA-classified store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/brain.toml")]
    config: PathBuf,

    /// Journal repository (`owner/name`), overriding `journal.repo`.
    #[arg(long, global = true, env = "JOURNAL_REPO")]
    repo: Option<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent — running it multiple times is safe.
    Init,

    /// Show the configured journal source and whether it is reachable.
    Sources,

    /// Ingest journal issues newer than the latest stored entry.
    ///
    /// Journals are processed oldest first. A journal whose body cannot be
    /// fetched, or a thought that cannot be stored, is reported and skipped.
    Sync {
        /// Ignore the stored watermark and re-read every listed journal.
        /// Already stored thoughts are skipped by checksum.
        #[arg(long)]
        full: bool,

        /// Atomize and count without writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of journals to ingest in this run.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the sync report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Atomize a local markdown file and print the resulting thoughts.
    Atomize {
        /// Path to the markdown journal entry.
        path: PathBuf,

        /// Entry date (YYYY-MM-DD). Defaults to the file name, then today.
        #[arg(long)]
        date: Option<String>,

        /// Print thoughts as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show stored thought counts per PARA category.
    Stats,
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "second_brain=info,second_brain_core=info",
        1 => "second_brain=debug,second_brain_core=debug",
        _ => "second_brain=trace,second_brain_core=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn validate_date(date: &str) -> anyhow::Result<()> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| anyhow::anyhow!("--date must be YYYY-MM-DD, got '{}'", date))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    // Previewing a file doesn't need a config on disk
    if let Commands::Atomize { path, date, json } = &cli.command {
        if let Some(d) = date {
            validate_date(d)?;
        }
        let cfg = if cli.config.exists() {
            config::load_config(&cli.config)?
        } else {
            config::Config::minimal()
        };
        preview::run_atomize(&cfg, path, date.clone(), *json)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    let repo = cli.repo.as_deref();

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Sources => {
            sources::list_sources(&cfg, repo).await?;
        }
        Commands::Sync {
            full,
            dry_run,
            limit,
            json,
        } => {
            let options = SyncOptions {
                full,
                dry_run,
                limit,
            };
            ingest::run_sync(&cfg, repo, options, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Atomize { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
