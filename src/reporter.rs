//! Serialized per-item success/failure reporting
//!
//! Every worker shares one reporter; all writes go through a single async
//! mutex so concurrent workers' lines never interleave mid-write. Ordering
//! across workers is whoever acquires the lock first, but each line is
//! atomic.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::types::{FailureKind, ReportEvent};

/// Shared, serialized writer for report events
///
/// Cheap to clone; clones share the underlying stream and its lock. Write
/// failures on the report stream are logged and dropped rather than failing
/// the worker, since there is nowhere left to report them.
#[derive(Clone)]
pub struct Reporter {
    out: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
}

impl Reporter {
    /// Create a reporter over any async writer
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Create a reporter over stdout
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }

    /// Report a successfully processed title
    ///
    /// Line format: `success:\t<title>`
    pub async fn success(&self, title: &str) {
        self.emit(&ReportEvent::Success {
            title: title.to_string(),
        })
        .await;
    }

    /// Report a failed title
    ///
    /// Line format: `failure:\t<title>\t<category>:<message>`, or
    /// `failure:\t<title>\t<message>` when no category applies.
    pub async fn failure(&self, title: &str, kind: Option<FailureKind>, message: &str) {
        self.emit(&ReportEvent::Failure {
            title: title.to_string(),
            kind,
            message: message.to_string(),
        })
        .await;
    }

    /// Write one event as a single line, holding the lock for the whole
    /// write so the line cannot interleave with another worker's
    pub async fn emit(&self, event: &ReportEvent) {
        let line = Self::format_line(event);

        let mut out = self.out.lock().await;
        if let Err(e) = out.write_all(line.as_bytes()).await {
            tracing::warn!(error = %e, "failed to write report line");
            return;
        }
        if let Err(e) = out.flush().await {
            tracing::warn!(error = %e, "failed to flush report stream");
        }
    }

    fn format_line(event: &ReportEvent) -> String {
        match event {
            ReportEvent::Success { title } => format!("success:\t{}\n", title),
            ReportEvent::Failure {
                title,
                kind: Some(kind),
                message,
            } => format!("failure:\t{}\t{}:{}\n", title, kind, message),
            ReportEvent::Failure {
                title,
                kind: None,
                message,
            } => format!("failure:\t{}\t{}\n", title, message),
        }
    }
}
