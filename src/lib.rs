//! # script-dl
//!
//! Concurrent movie-script scraper library with downstream feature tooling.
//!
//! ## Design Philosophy
//!
//! script-dl is designed to be:
//! - **Library-first** - The pipeline is embeddable; the CLI is a thin wrapper
//! - **Bounded** - A fixed worker pool caps concurrent outbound connections
//! - **Partial-failure tolerant** - A failed item never stops the run
//! - **Stream-oriented** - Input and report streams are caller-supplied
//!
//! ## Quick Start
//!
//! ```no_run
//! use script_dl::{Config, ScriptScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let scraper = ScriptScraper::new(config)?;
//!
//!     let input = tokio::io::BufReader::new(tokio::io::stdin());
//!     let stats = scraper.run(input).await?;
//!
//!     eprintln!(
//!         "done: {} succeeded, {} failed, {} skipped",
//!         stats.succeeded, stats.failed, stats.skipped
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Document tree traversal (predicate search and text flattening)
pub mod dom;
/// Error types
pub mod error;
/// Script page fetching and content-block extraction
pub mod fetcher;
/// Unigram/bigram feature generation from scraped scripts
pub mod features;
/// Outer join of per-title feature CSVs
pub mod join;
/// Artifact persistence (text and metadata files)
pub mod persist;
/// Serialized per-item success/failure reporting
pub mod reporter;
/// The concurrent fetch-extract-persist pipeline
pub mod scraper;
/// Core types and report events
pub mod types;

// Re-export commonly used types
pub use config::{Config, FetchConfig, OutputConfig, PoolConfig};
pub use error::{Error, PersistError, Result, ScrapeError};
pub use fetcher::ScriptFetcher;
pub use reporter::Reporter;
pub use scraper::ScriptScraper;
pub use types::{FailureKind, ReportEvent, RunStats, WorkItem};
