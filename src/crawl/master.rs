//! The crawl master (spec §4.3): owns the task/result channels, the visited set, and
//! worker supervision; exposes `AddTask`/`BulkAdd`/`GetStats` for the control plane,
//! and `Start`/`Stop` for the whole pipeline's lifecycle.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashSet;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use crate::config::Config;
use crate::crawl::consumer;
use crate::crawl::task::url_fingerprint;
use crate::crawl::worker::{self, WorkerStats};
use crate::fetch::Fetcher;
use crate::index::store::InvertedIndex;
use crate::model::{CrawlTask, WorkerStats as WorkerStatsDto};

const INIT: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;
const STOPPED: u8 = 3;

pub struct CrawlMaster {
    config: Arc<Config>,
    index: Arc<InvertedIndex>,
    task_tx: Mutex<Option<mpsc::Sender<CrawlTask>>>,
    task_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<CrawlTask>>>,
    result_tx: mpsc::Sender<crate::model::CrawlResult>,
    result_rx: tokio::sync::Mutex<Option<mpsc::Receiver<crate::model::CrawlResult>>>,
    visited: DashSet<u32>,
    total_tasks: Arc<AtomicU64>,
    total_results: Arc<AtomicU64>,
    worker_stats: Mutex<Vec<Arc<WorkerStats>>>,
    cancel: CancellationToken,
    handles: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
    state: AtomicU8,
}

impl CrawlMaster {
    pub fn new(config: Arc<Config>, index: Arc<InvertedIndex>) -> Self {
        let capacity = config.channel_capacity().max(1);
        let (task_tx, task_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        Self {
            config,
            index,
            task_tx: Mutex::new(Some(task_tx)),
            task_rx: Arc::new(tokio::sync::Mutex::new(task_rx)),
            result_tx,
            result_rx: tokio::sync::Mutex::new(Some(result_rx)),
            visited: DashSet::new(),
            total_tasks: Arc::new(AtomicU64::new(0)),
            total_results: Arc::new(AtomicU64::new(0)),
            worker_stats: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
            handles: tokio::sync::Mutex::new(Vec::new()),
            state: AtomicU8::new(INIT),
        }
    }

    /// `AddTask` (spec §4.3): dedups by URL fingerprint, then attempts a non-blocking
    /// enqueue, dropping silently on a full channel. Returns whether the task was
    /// newly accepted into the visited set (not whether it made it onto the channel —
    /// a channel-full drop is backpressure, not a dedup rejection).
    pub fn add_task(&self, task: CrawlTask) -> bool {
        let fingerprint = url_fingerprint(&task.url);
        if !self.visited.insert(fingerprint) {
            return false;
        }
        self.total_tasks.fetch_add(1, Ordering::Relaxed);

        let guard = self.task_tx.lock().expect("task_tx lock poisoned");
        if let Some(tx) = guard.as_ref() {
            if tx.try_send(task).is_err() {
                warn!("task queue full or closed, dropping task");
            }
        }
        true
    }

    /// `BulkAdd` (spec §6 `BULK_ADD`): enqueues each URL, returns the count newly accepted.
    pub fn bulk_add(&self, urls: Vec<String>) -> usize {
        urls.into_iter()
            .filter(|u| self.add_task(CrawlTask::new(u.clone(), 0, "bulk")))
            .count()
    }

    pub fn total_tasks(&self) -> u64 {
        self.total_tasks.load(Ordering::Relaxed)
    }

    pub fn total_results(&self) -> u64 {
        self.total_results.load(Ordering::Relaxed)
    }

    pub fn num_workers(&self) -> usize {
        self.worker_stats.lock().expect("worker_stats lock poisoned").len()
    }

    /// `GetStats` (spec §6 `GET_STATS`).
    pub fn worker_stats_snapshot(&self) -> Vec<WorkerStatsDto> {
        self.worker_stats
            .lock()
            .expect("worker_stats lock poisoned")
            .iter()
            .map(|s| s.snapshot())
            .collect()
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Pops one task straight off the queue, bypassing worker dispatch. Test-only:
    /// production code only ever drains the queue through `worker::run`.
    #[cfg(test)]
    pub(crate) fn try_recv_task(&self) -> Option<CrawlTask> {
        self.task_rx.try_lock().ok()?.try_recv().ok()
    }

    /// `Start()` (spec §4.3): spawns the result consumer, `N` workers, the monitor, and
    /// the seeder. The admin/control IPC accept loop is spawned separately by the
    /// composition root (see `crate::ipc`), which needs a `SearchEngine` reference too.
    pub async fn start(self: &Arc<Self>, fetcher: Arc<Fetcher>, allow_list: Arc<Vec<String>>) {
        self.state.store(RUNNING, Ordering::SeqCst);
        let mut handles = self.handles.lock().await;

        let result_rx = self
            .result_rx
            .lock()
            .await
            .take()
            .expect("start() called more than once");

        handles.push(tokio::spawn(consumer::run(
            self.clone(),
            self.index.clone(),
            result_rx,
            allow_list,
            self.total_results.clone(),
            self.cancel.clone(),
        )));

        for id in 0..self.config.num_workers {
            let stats = Arc::new(WorkerStats::new(id));
            self.worker_stats.lock().expect("worker_stats lock poisoned").push(stats.clone());
            handles.push(tokio::spawn(worker::run(
                stats,
                self.task_rx.clone(),
                self.result_tx.clone(),
                fetcher.clone(),
                self.cancel.clone(),
            )));
        }

        handles.push(tokio::spawn(self.clone().monitor_loop()));
        handles.push(tokio::spawn(self.clone().seeder()));
    }

    async fn monitor_loop(self: Arc<Self>) {
        let span = info_span!("monitor");
        async move {
            // Small random offset on the first tick so many masters started at once
            // don't all log in lockstep.
            let jitter_ms = rand::rng().random_range(0..1000);
            let first_wait = self.config.monitor_interval + std::time::Duration::from_millis(jitter_ms);

            let mut interval = tokio::time::interval(self.config.monitor_interval);
            interval.reset_after(first_wait);

            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = interval.tick() => {
                        info!(
                            total_tasks = self.total_tasks(),
                            total_results = self.total_results(),
                            num_workers = self.num_workers(),
                            "crawl tally"
                        );
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn seeder(self: Arc<Self>) {
        for url in self.config.seed_urls.clone() {
            self.add_task(CrawlTask::new(url, 0, "seed"));
        }
    }

    /// `Stop()` (spec §4.3): cancels the shared scope, closes the task channel, and
    /// joins every spawned task.
    pub async fn stop(self: &Arc<Self>) {
        self.state.store(STOPPING, Ordering::SeqCst);
        self.cancel.cancel();
        self.task_tx.lock().expect("task_tx lock poisoned").take(); // drop => closes the channel.

        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        self.state.store(STOPPED, Ordering::SeqCst);
    }
}
