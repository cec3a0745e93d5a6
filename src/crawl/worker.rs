//! A single crawl worker (spec §4.4): pulls from the task channel, fetches, times the
//! fetch, updates its own atomic counters and status, and publishes the result
//! non-blockingly. A worker never touches the index directly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, warn, Instrument};

use crate::fetch::Fetcher;
use crate::model::{CrawlResult, CrawlTask};

/// Observable per-worker state, readable via `GET_STATS` while the worker runs.
pub struct WorkerStats {
    pub id: usize,
    pub tasks_processed: AtomicU64,
    pub tasks_success: AtomicU64,
    pub tasks_failed: AtomicU64,
    pub last_active: AtomicU64,
    pub status: Mutex<String>,
}

impl WorkerStats {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tasks_processed: AtomicU64::new(0),
            tasks_success: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            last_active: AtomicU64::new(0),
            status: Mutex::new("idle".to_string()),
        }
    }

    fn set_status(&self, status: &str) {
        *self.status.lock().expect("worker status lock poisoned") = status.to_string();
    }

    fn touch(&self) {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        self.last_active.store(now, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> crate::model::WorkerStats {
        crate::model::WorkerStats {
            id: self.id,
            tasks_processed: self.tasks_processed.load(Ordering::Relaxed),
            tasks_success: self.tasks_success.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            last_active: {
                let v = self.last_active.load(Ordering::Relaxed);
                if v == 0 { None } else { Some(v) }
            },
            status: self.status.lock().expect("worker status lock poisoned").clone(),
        }
    }
}

/// Runs the worker loop: `idle -> working -> idle`, reaching `shutdown` from either
/// state once `cancel` fires (spec §4.11 state machine).
pub async fn run(
    stats: std::sync::Arc<WorkerStats>,
    task_rx: std::sync::Arc<tokio::sync::Mutex<mpsc::Receiver<CrawlTask>>>,
    result_tx: mpsc::Sender<CrawlResult>,
    fetcher: std::sync::Arc<Fetcher>,
    cancel: CancellationToken,
) {
    let span = info_span!("worker", id = stats.id);
    async move {
        loop {
            let task = tokio::select! {
                _ = cancel.cancelled() => break,
                task = async {
                    let mut rx = task_rx.lock().await;
                    rx.recv().await
                } => task,
            };

            let Some(task) = task else {
                break; // task channel closed: no more work will ever arrive.
            };

            stats.set_status("working");
            stats.touch();

            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = fetcher.fetch(&task.url) => outcome,
            };

            stats.tasks_processed.fetch_add(1, Ordering::Relaxed);
            if outcome.success {
                stats.tasks_success.fetch_add(1, Ordering::Relaxed);
            } else {
                stats.tasks_failed.fetch_add(1, Ordering::Relaxed);
                warn!(url = %task.url, error = ?outcome.error, "fetch failed");
            }

            let title = crate::text::extract_title(&outcome.body).unwrap_or_default();
            let stripped = crate::text::strip_markup(&outcome.body);
            let base_url = url::Url::parse(&outcome.url).ok();
            let outlinks = base_url
                .as_ref()
                .map(|b| crate::text::extract_links(&outcome.body, b))
                .unwrap_or_default();

            let result = CrawlResult {
                url: outcome.url,
                title,
                content: stripped,
                outlinks,
                size: outcome.size,
                status: outcome.status,
                success: outcome.success,
                error: outcome.error,
                duration: outcome.duration,
                timestamp: SystemTime::now(),
                quality: 0.0, // filled in by the result consumer once content is final.
            };

            // Non-blocking publish: drop on a full channel to preserve liveness (spec §5).
            let _ = result_tx.try_send(result);
            stats.set_status("idle");
        }
        stats.set_status("shutdown");
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_snapshot_reflects_counters() {
        let stats = WorkerStats::new(3);
        stats.tasks_processed.store(5, Ordering::Relaxed);
        stats.tasks_success.store(4, Ordering::Relaxed);
        stats.tasks_failed.store(1, Ordering::Relaxed);
        let snap = stats.snapshot();
        assert_eq!(snap.id, 3);
        assert_eq!(snap.tasks_processed, 5);
        assert_eq!(snap.tasks_success, 4);
        assert_eq!(snap.tasks_failed, 1);
        assert_eq!(snap.status, "idle");
    }
}
