//! Input reading and queue feeding.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Read newline-delimited records from `input` and push each raw line onto
/// the bounded queue
///
/// Reading stops at the first empty line or at end of stream; an empty line
/// mid-stream is therefore indistinguishable from end of input. This matches
/// the historical input contract and silently truncates input containing a
/// genuinely blank line.
///
/// Lines are pushed unparsed; validation happens in the workers. Dropping
/// the sender on return closes the queue, signalling the pool that no more
/// items are coming. Returns the number of dispatched lines.
pub async fn dispatch_lines<R>(input: R, queue: mpsc::Sender<String>) -> u64
where
    R: AsyncBufRead + Send + Unpin,
{
    let mut lines = input.lines();
    let mut dispatched = 0u64;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.is_empty() {
                    tracing::debug!(dispatched, "empty line terminates input");
                    break;
                }
                if queue.send(line).await.is_err() {
                    // Every worker has dropped its receiver; nothing left to
                    // feed.
                    tracing::warn!(dispatched, "work queue closed before input was exhausted");
                    break;
                }
                dispatched += 1;
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, dispatched, "input read failed, stopping dispatch");
                break;
            }
        }
    }

    tracing::debug!(dispatched, "dispatcher finished");
    dispatched
}
