//! Per-item processing: parse, skip, fetch, flatten, persist, report.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use super::ScriptScraper;
use crate::dom;
use crate::types::{FailureKind, RunStats, UNKNOWN_TITLE, WorkItem};

/// How processing one line ended
enum ItemOutcome {
    Succeeded,
    Skipped,
    Failed,
}

impl ScriptScraper {
    /// Drain the shared queue until it is closed and empty
    pub(crate) async fn worker_loop(
        &self,
        worker_id: usize,
        queue: Arc<Mutex<mpsc::Receiver<String>>>,
    ) -> RunStats {
        let mut stats = RunStats::default();

        loop {
            // Hold the receiver lock only for the recv itself so other
            // workers can pull while this one processes.
            let line = { queue.lock().await.recv().await };
            let Some(line) = line else {
                break;
            };

            match self.process_line(&line).await {
                ItemOutcome::Succeeded => stats.succeeded += 1,
                ItemOutcome::Skipped => stats.skipped += 1,
                ItemOutcome::Failed => stats.failed += 1,
            }
        }

        tracing::debug!(
            worker_id,
            succeeded = stats.succeeded,
            failed = stats.failed,
            skipped = stats.skipped,
            "worker finished"
        );
        stats
    }

    /// Run one work item through the whole pipeline
    ///
    /// Every failure is reported and terminates this item only; the pool
    /// keeps running regardless of the outcome.
    async fn process_line(&self, line: &str) -> ItemOutcome {
        let Some(item) = WorkItem::parse(line) else {
            self.reporter
                .failure(UNKNOWN_TITLE, None, "invalid input line")
                .await;
            return ItemOutcome::Failed;
        };

        let normalized = item.normalized_title();

        if self.store.meta_exists(&normalized).await {
            self.reporter
                .failure(&item.title, None, "script already found")
                .await;
            return ItemOutcome::Skipped;
        }

        // The parsed page is not Send; flattening it inside the map drops
        // it before this future reaches another await point.
        let fetched = self
            .fetcher
            .fetch(&item.title)
            .await
            .map(|page| dom::flatten(page.content()));
        let content = match fetched {
            Ok(content) => content,
            Err(e) => {
                self.reporter
                    .failure(&item.title, Some(FailureKind::Scrape), &e.to_string())
                    .await;
                return ItemOutcome::Failed;
            }
        };

        if let Err(e) = self.store.write_script(&normalized, &content).await {
            self.reporter
                .failure(&item.title, Some(e.failure_kind()), &e.to_string())
                .await;
            return ItemOutcome::Failed;
        }

        // The metadata artifact is written last: its existence marks the
        // title as done, so it must not appear before the text artifact.
        if let Err(e) = self.store.write_meta(&normalized, &item.raw_line).await {
            self.reporter
                .failure(&item.title, Some(e.failure_kind()), &e.to_string())
                .await;
            return ItemOutcome::Failed;
        }

        self.reporter.success(&item.title).await;
        ItemOutcome::Succeeded
    }
}
