//! Composition root: wires `Config::from_env`, tracing, the inverted index, the crawl
//! master, the control-plane listener, and a periodic PageRank refresh together, then
//! blocks until a shutdown signal arrives (spec §11).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hyperweave::config::Config;
use hyperweave::crawl::CrawlMaster;
use hyperweave::fetch::Fetcher;
use hyperweave::index::store::InvertedIndex;
use hyperweave::index::PageRank;
use hyperweave::ipc;
use hyperweave::query::synonyms;
use hyperweave::query::SearchEngine;
use hyperweave::text::quality::load_allow_list;
use hyperweave::text::stopwords::load_stop_words;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env());
    info!(num_workers = config.num_workers, socket_path = %config.socket_path, "starting hyperweave");

    let stop_words = Arc::new(load_stop_words(config.stop_words_path.as_deref()));
    let synonyms = synonyms::load_synonyms(config.synonyms_path.as_deref());
    let allow_list = Arc::new(load_allow_list(config.allow_list_path.as_deref()));

    let index = Arc::new(InvertedIndex::new(stop_words.clone()));
    let engine = Arc::new(SearchEngine::new(index.clone(), stop_words, synonyms, config.cache_ttl));

    let master = Arc::new(CrawlMaster::new(config.clone(), index.clone()));
    let fetcher = Arc::new(Fetcher::new(config.fetch_timeout, config.fetch_max_bytes));

    master.start(fetcher, allow_list).await;

    let cancel = master.cancellation();
    let ipc_handle = tokio::spawn(ipc::serve(config.socket_path.clone(), master.clone(), engine.clone(), cancel.clone()));
    let pagerank_handle = tokio::spawn(pagerank_refresh_loop(index.clone(), config.clone(), cancel.clone()));

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, stopping");

    master.stop().await;
    cancel.cancel();
    let _ = ipc_handle.await;
    let _ = pagerank_handle.await;

    info!("hyperweave stopped");
}

/// Recomputes PageRank over the current corpus every `2 * monitor_interval` (spec
/// §4.6/§4.7 generalized to a long-running service instead of a one-shot `BuildIndex`).
async fn pagerank_refresh_loop(index: Arc<InvertedIndex>, config: Arc<Config>, cancel: CancellationToken) {
    let interval = config.monitor_interval * 2;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {
                let nodes = index.all_doc_ids();
                if nodes.is_empty() {
                    continue;
                }
                let ranks = PageRank::compute(&nodes, &index.links, config.pagerank_damping, config.pagerank_iterations);
                index.apply_pagerank(&ranks);
                index.sort_all_postings();
                info!(documents = nodes.len(), "pagerank refresh complete");
            }
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigterm.recv() => {},
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
