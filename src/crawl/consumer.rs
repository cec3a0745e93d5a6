//! The result consumer (spec §4.5): for each successful `CrawlResult`, builds a
//! `Document`, indexes it, and walks its outlinks back into the task queue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use crate::crawl::master::CrawlMaster;
use crate::crawl::task::is_valid_url;
use crate::index::store::InvertedIndex;
use crate::model::{CrawlResult, CrawlTask, Document};
use crate::text::quality::score_quality;

/// Runs the result-consumer loop until `result_tx` is dropped and drained, or `cancel`
/// fires. `total_results` is the master's shared counter, bumped once per result seen
/// (successful or not — the count tracks fan-in volume, not corpus size).
pub async fn run(
    master: Arc<CrawlMaster>,
    index: Arc<InvertedIndex>,
    mut result_rx: mpsc::Receiver<CrawlResult>,
    allow_list: Arc<Vec<String>>,
    total_results: Arc<AtomicU64>,
    cancel: CancellationToken,
) {
    let span = info_span!("result_consumer");
    async move {
        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = result_rx.recv() => result,
            };

            let Some(result) = result else {
                break;
            };

            total_results.fetch_add(1, Ordering::Relaxed);

            if !result.success {
                continue; // fetch failure: absorbed already by the worker (spec §7).
            }

            let quality = score_quality(&result.title, &result.content, &result.url, &allow_list);
            let length = result.content.split_whitespace().count();
            let id = index.doc_id_for_url(&result.url);

            let doc = Document {
                id,
                url: result.url.clone(),
                title: result.title,
                content: result.content,
                length,
                // Seeded from quality (spec §9 decision); overwritten once PageRank runs.
                pagerank: quality,
                quality,
            };

            index.add_document(doc);
            debug!(url = %result.url, "indexed document");

            for link in result.outlinks {
                if !is_valid_url(&link) {
                    continue;
                }
                // Link-graph edges are restricted to URLs already present in the corpus
                // (spec §3); a target not yet crawled gets its edge once it is indexed
                // and some other page's outlinks are walked again.
                if let Some(target_id) = index.existing_doc_id(&link) {
                    index.links.add_edge(id, target_id);
                }
                master.add_task(CrawlTask::new(link, 0, "outlink"));
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::text::stopwords::default_stop_words;
    use std::time::{Duration, SystemTime};

    fn successful_result(url: &str, title: &str, content: &str, outlinks: Vec<String>) -> CrawlResult {
        CrawlResult {
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            outlinks,
            size: content.len(),
            status: Some(200),
            success: true,
            error: None,
            duration: Duration::from_millis(10),
            timestamp: SystemTime::now(),
            quality: 0.0,
        }
    }

    #[tokio::test]
    async fn successful_result_is_indexed_and_outlinks_requeued() {
        let cfg = Arc::new(Config::default());
        let index = Arc::new(InvertedIndex::new(Arc::new(default_stop_words())));
        let master = Arc::new(CrawlMaster::new(cfg, index.clone()));
        let (result_tx, result_rx) = mpsc::channel(10);
        let allow_list = Arc::new(Vec::new());
        let total_results = Arc::new(AtomicU64::new(0));
        let cancel = CancellationToken::new();

        let res = successful_result(
            "https://a.example/",
            "A useful title about rust",
            "rust is a systems programming language with great tooling",
            vec!["https://b.example/".to_string()],
        );
        result_tx.send(res).await.unwrap();
        drop(result_tx);

        run(master.clone(), index.clone(), result_rx, allow_list, total_results.clone(), cancel).await;

        assert!(index.document_by_url("https://a.example/").is_some());
        assert_eq!(total_results.load(Ordering::Relaxed), 1);
        assert_eq!(master.total_tasks(), 1, "outlink should have been enqueued as a new task");
    }

    #[tokio::test]
    async fn failed_result_is_not_indexed() {
        let cfg = Arc::new(Config::default());
        let index = Arc::new(InvertedIndex::new(Arc::new(default_stop_words())));
        let master = Arc::new(CrawlMaster::new(cfg, index.clone()));
        let (result_tx, result_rx) = mpsc::channel(10);
        let allow_list = Arc::new(Vec::new());
        let total_results = Arc::new(AtomicU64::new(0));
        let cancel = CancellationToken::new();

        let mut res = successful_result("https://a.example/", "t", "c", vec![]);
        res.success = false;
        result_tx.send(res).await.unwrap();
        drop(result_tx);

        run(master, index.clone(), result_rx, allow_list, total_results.clone(), cancel).await;

        assert!(index.document_by_url("https://a.example/").is_none());
        assert_eq!(total_results.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn outlink_to_already_indexed_page_adds_a_link_graph_edge() {
        let cfg = Arc::new(Config::default());
        let index = Arc::new(InvertedIndex::new(Arc::new(default_stop_words())));
        let master = Arc::new(CrawlMaster::new(cfg, index.clone()));
        let allow_list = Arc::new(Vec::new());
        let total_results = Arc::new(AtomicU64::new(0));

        // b.example is indexed first, so when a.example's outlinks are walked, the
        // target already exists in the corpus and the edge should be recorded.
        let b_id = index.doc_id_for_url("https://b.example/");
        index.add_document(Document {
            id: b_id,
            url: "https://b.example/".to_string(),
            title: "B page".to_string(),
            content: "some content about b".to_string(),
            length: 4,
            pagerank: 0.0,
            quality: 0.5,
        });

        let (result_tx, result_rx) = mpsc::channel(10);
        let res = successful_result(
            "https://a.example/",
            "A page",
            "some content about a linking elsewhere",
            vec!["https://b.example/".to_string()],
        );
        result_tx.send(res).await.unwrap();
        drop(result_tx);

        let cancel = CancellationToken::new();
        run(master, index.clone(), result_rx, allow_list, total_results, cancel).await;

        let a_id = index.existing_doc_id("https://a.example/").unwrap();
        assert_eq!(index.links.outlinks(a_id), vec![b_id]);
    }

    #[tokio::test]
    async fn outlink_to_uncrawled_page_adds_no_edge_yet() {
        let cfg = Arc::new(Config::default());
        let index = Arc::new(InvertedIndex::new(Arc::new(default_stop_words())));
        let master = Arc::new(CrawlMaster::new(cfg, index.clone()));
        let allow_list = Arc::new(Vec::new());
        let total_results = Arc::new(AtomicU64::new(0));
        let (result_tx, result_rx) = mpsc::channel(10);

        let res = successful_result(
            "https://a.example/",
            "A page",
            "some content about a linking elsewhere",
            vec!["https://never-crawled.example/".to_string()],
        );
        result_tx.send(res).await.unwrap();
        drop(result_tx);

        let cancel = CancellationToken::new();
        run(master, index.clone(), result_rx, allow_list, total_results, cancel).await;

        let a_id = index.existing_doc_id("https://a.example/").unwrap();
        assert!(index.links.outlinks(a_id).is_empty(), "target isn't in the corpus yet, so no edge should exist");
    }
}
