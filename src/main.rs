//! script-dl command-line entry point
//!
//! Thin wrapper around the library: `scrape` runs the concurrent pipeline
//! over stdin, `features` and `join` are the downstream batch transforms.
//! Report lines go to stdout; logs go to stderr so the report stream stays
//! machine-readable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use script_dl::config::Config;
use script_dl::{ScriptScraper, features, join};
use tracing_subscriber::EnvFilter;

/// Concurrent movie script scraper with feature extraction tooling
#[derive(Parser, Debug)]
#[command(name = "script-dl")]
#[command(version)]
#[command(about = "Concurrent movie script scraper", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the titles read from stdin and persist one .txt/.meta
    /// artifact pair per title
    Scrape {
        /// Path to a JSON configuration file (missing fields take defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for artifacts (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of concurrent workers (overrides config)
        #[arg(long)]
        workers: Option<usize>,

        /// Endpoint template the title page is fetched from (overrides
        /// config)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Generate features-<title>.csv for every scraped title in a directory
    Features {
        /// Directory holding the .txt/.meta artifact pairs
        #[arg(long = "in")]
        input_dir: PathBuf,

        /// Directory to write feature CSVs into (default: the input
        /// directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Outer-join feature CSVs into one table on stdout
    Join {
        /// Directory holding features-*.csv files
        #[arg(long = "in")]
        input_dir: PathBuf,

        /// Drop features occurring in fewer than this percent of titles
        #[arg(long, default_value_t = 5)]
        min_pct: u64,

        /// Drop features occurring in more than this percent of titles
        #[arg(long, default_value_t = 90)]
        max_pct: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Scrape {
            config,
            out,
            workers,
            endpoint,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };
            if let Some(out) = out {
                config.output.output_dir = out;
            }
            if let Some(workers) = workers {
                config.pool.workers = workers;
            }
            if let Some(endpoint) = endpoint {
                config.fetch.endpoint = endpoint;
            }

            // Configuration errors abort here with a non-zero exit;
            // per-item failures below only show up on the report stream.
            let scraper = ScriptScraper::new(config)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let stats = scraper.run(input).await?;

            tracing::info!(
                succeeded = stats.succeeded,
                failed = stats.failed,
                skipped = stats.skipped,
                "scrape finished"
            );
        }

        Command::Features { input_dir, out } => {
            let out_dir = out.unwrap_or_else(|| input_dir.clone());
            let processed = features::generate_all(&input_dir, &out_dir)?;
            tracing::info!(processed, "feature generation finished");
        }

        Command::Join {
            input_dir,
            min_pct,
            max_pct,
        } => {
            let csv = join::join_directory(&input_dir, min_pct, max_pct)?;
            print!("{}", csv);
        }
    }

    Ok(())
}

/// Set up the tracing subscriber based on verbosity level
///
/// Logs are written to stderr; stdout is reserved for report lines and the
/// joined CSV.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("script_dl=info,warn"),
            1 => EnvFilter::new("script_dl=debug,info"),
            2 => EnvFilter::new("script_dl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
