//! Bounded-concurrency fetch fan-out with memory-aware admission.
//!
//! [`dispatch`] starts every URL in a set through the fetch engine, keeping
//! at most `concurrency_limit` fetches in flight, and streams
//! [`FetchOutcome`]s back over a bounded channel in completion order. Before
//! admitting each new fetch it consults the process-wide memory gauge; while
//! utilisation is over budget no new work starts, but in-flight fetches are
//! never cancelled.
//!
//! Failures are isolated per URL: a timeout or render error becomes an
//! outcome with `success = false` and never aborts sibling fetches. A URL is
//! never retried within one dispatch.

use crate::fetch::{FetchEngine, FetchOptions};
use crate::memory;
use crate::types::FetchOutcome;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long to sleep between admission re-checks while over budget.
const PRESSURE_POLL: Duration = Duration::from_millis(250);

/// Outcome channel capacity. Small — the consumer drains promptly or not
/// at all.
const CHANNEL_CAPACITY: usize = 8;

/// Fan a URL set out through the fetch engine, yielding outcomes as they
/// complete.
///
/// The returned receiver produces exactly one [`FetchOutcome`] per URL and
/// closes once all have completed. Dropping the receiver early abandons the
/// remaining work: nothing further is started and in-flight fetches are
/// dropped at their next suspension point.
pub fn dispatch<E>(
    engine: Arc<E>,
    urls: Vec<String>,
    options: FetchOptions,
    concurrency_limit: usize,
    memory_budget: f64,
) -> mpsc::Receiver<FetchOutcome>
where
    E: FetchEngine + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let limit = concurrency_limit.max(1);

    tokio::spawn(async move {
        let total = urls.len();
        let mut pending = urls.into_iter().peekable();
        let mut in_flight = FuturesUnordered::new();
        tracing::debug!(total, limit, "dispatch started");

        loop {
            // Admit new fetches while there is a free slot and memory
            // pressure allows.
            while in_flight.len() < limit && pending.peek().is_some() {
                if memory::utilization() > memory_budget {
                    if in_flight.is_empty() {
                        if tx.is_closed() {
                            tracing::debug!("consumer gone; abandoning dispatch");
                            return;
                        }
                        tracing::warn!(
                            budget = memory_budget,
                            "memory over budget — pausing fetch admission"
                        );
                        tokio::time::sleep(PRESSURE_POLL).await;
                        continue;
                    }
                    // Let in-flight work drain before admitting more.
                    break;
                }
                if let Some(url) = pending.next() {
                    let engine = Arc::clone(&engine);
                    let opts = options.clone();
                    in_flight.push(async move { fetch_one(engine, url, opts).await });
                }
            }

            match in_flight.next().await {
                Some(outcome) => {
                    if tx.send(outcome).await.is_err() {
                        tracing::debug!("consumer stopped draining; abandoning dispatch");
                        break;
                    }
                }
                None => break,
            }
        }
    });

    rx
}

async fn fetch_one<E: FetchEngine>(
    engine: Arc<E>,
    url: String,
    options: FetchOptions,
) -> FetchOutcome {
    match engine.fetch(&url, &options).await {
        Ok(page) => FetchOutcome {
            source_url: url,
            success: page.success,
            final_url: Some(page.final_url),
            content: page.content,
            error: None,
        },
        Err(err) => {
            tracing::warn!(url, error = %err, "fetch failed");
            FetchOutcome {
                source_url: url,
                success: false,
                final_url: None,
                content: None,
                error: Some(err.to_string()),
            }
        }
    }
}
