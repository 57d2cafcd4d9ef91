//! The concurrent fetch-extract-persist pipeline.
//!
//! The [`ScriptScraper`] owns the shared pieces every worker needs and is
//! organized into focused submodules:
//! - [`dispatcher`] - Input reading and queue feeding
//! - [`worker`] - Per-item processing (parse, skip, fetch, flatten, persist)
//!
//! One dispatcher task feeds a bounded queue; a fixed pool of workers drains
//! it. A run completes when the input is exhausted, the queue is drained,
//! and every worker has exited.

mod dispatcher;
mod worker;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use dispatcher::dispatch_lines;

use std::sync::Arc;

use tokio::io::AsyncBufRead;
use tokio::sync::{Mutex, mpsc};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::ScriptFetcher;
use crate::persist::ArtifactStore;
use crate::reporter::Reporter;
use crate::types::RunStats;

/// The scraping pipeline (cloneable - all fields are shared handles)
#[derive(Clone)]
pub struct ScriptScraper {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Fetches pages and extracts content blocks
    pub(crate) fetcher: ScriptFetcher,
    /// Writes and probes per-title artifacts
    pub(crate) store: ArtifactStore,
    /// Serialized report stream shared by all workers
    pub(crate) reporter: Reporter,
}

impl ScriptScraper {
    /// Create a pipeline reporting to stdout
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_reporter(config, Reporter::stdout())
    }

    /// Create a pipeline with a caller-supplied reporter
    pub fn with_reporter(config: Config, reporter: Reporter) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let fetcher = ScriptFetcher::new(Arc::clone(&config))?;
        let store = ArtifactStore::new(config.output.output_dir.clone());
        Ok(Self {
            config,
            fetcher,
            store,
            reporter,
        })
    }

    /// Run the pipeline over an input stream until it is exhausted
    ///
    /// Spawns the dispatcher and the configured number of workers, then
    /// joins them all. Per-item failures are reported and counted but never
    /// abort the run.
    pub async fn run<R>(&self, input: R) -> Result<RunStats>
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(self.config.pool.queue_capacity);
        let queue = Arc::new(Mutex::new(rx));

        let dispatcher = tokio::spawn(dispatch_lines(input, tx));

        let worker_count = self.config.pool.workers;
        tracing::info!(workers = worker_count, "starting worker pool");

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let scraper = self.clone();
            let queue = Arc::clone(&queue);
            workers.push(tokio::spawn(async move {
                scraper.worker_loop(worker_id, queue).await
            }));
        }

        let dispatched = dispatcher
            .await
            .map_err(|e| Error::Other(format!("dispatcher task panicked: {}", e)))?;

        let mut stats = RunStats::default();
        for (worker_id, handle) in futures::future::join_all(workers)
            .await
            .into_iter()
            .enumerate()
        {
            let worker_stats = handle
                .map_err(|e| Error::Other(format!("worker {} panicked: {}", worker_id, e)))?;
            stats.merge(worker_stats);
        }

        tracing::info!(
            dispatched,
            succeeded = stats.succeeded,
            failed = stats.failed,
            skipped = stats.skipped,
            "pipeline run complete"
        );
        Ok(stats)
    }
}
