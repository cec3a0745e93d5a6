//! Core data model (spec §3): documents, postings, crawl tasks/results, and the
//! arena-keyed `DocId` identity scheme (spec §9) that lets postings and the link graph
//! reference an integer instead of repeating URL strings.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Process-local monotonic identity for a document. Stable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(pub u64);

/// A fetched, parsed page. Immutable once inserted; re-insertion by the same URL
/// replaces the stored value in place (the `DocId` is preserved across the replace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub url: String,
    pub title: String,
    pub content: String,
    /// Word count of `content`.
    pub length: usize,
    /// PageRank value in `[0,1]`. Seeded from `quality` at ingestion (spec §9 decision),
    /// overwritten wholesale once `PageRank::compute` has run over the corpus.
    pub pagerank: f64,
    /// Crawl-time quality estimate in `[0,1]`, independent of `pagerank` (spec §9 decision).
    pub quality: f64,
}

/// An occurrence record: one term, one document, one precomputed score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub score: f64,
}

/// A unit of crawl work. Lives only in the task queue; discarded once a worker accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlTask {
    pub url: String,
    pub depth: u32,
    /// Priority in `[0,1]`. Not currently used to reorder the bounded FIFO channel
    /// (spec §4.3 describes simple enqueue/drop, not priority scheduling), but is
    /// carried through so a future scheduler has it to work with.
    pub priority: f64,
    pub source: String,
    pub enqueued_at: SystemTime,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth,
            priority: 0.5,
            source: source.into(),
            enqueued_at: SystemTime::now(),
        }
    }

    /// Overrides the default priority (spec §6 `ADD_TASK.priority`).
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// The outcome of one fetch+parse attempt. Lives only between worker and consumer.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    pub url: String,
    pub title: String,
    pub content: String,
    pub outlinks: Vec<String>,
    pub size: usize,
    pub status: Option<u16>,
    pub success: bool,
    pub error: Option<String>,
    pub duration: Duration,
    pub timestamp: SystemTime,
    pub quality: f64,
}

/// Per-worker stats snapshot exposed via `GET_STATS` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStats {
    pub id: usize,
    pub tasks_processed: u64,
    pub tasks_success: u64,
    pub tasks_failed: u64,
    pub last_active: Option<u64>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_task_new_has_sensible_defaults() {
        let task = CrawlTask::new("https://example.com", 0, "seed");
        assert_eq!(task.url, "https://example.com");
        assert_eq!(task.depth, 0);
        assert_eq!(task.source, "seed");
        assert!((0.0..=1.0).contains(&task.priority));
    }

    #[test]
    fn with_priority_overrides_the_default() {
        let task = CrawlTask::new("https://example.com", 0, "seed").with_priority(0.9);
        assert_eq!(task.priority, 0.9);
    }
}
