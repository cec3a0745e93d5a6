//! Admin/control-plane IPC (spec §4.3/§6): line-delimited JSON frames over a Unix
//! domain socket, owned and accepted by the crawl master. This is the engine's own
//! operational surface, distinct from any outward-facing HTTP API a deployment might
//! put in front of it (spec §1).

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::crawl::master::CrawlMaster;
use crate::error::IpcError;
use crate::model::CrawlTask;
use crate::query::SearchEngine;

/// One decoded control-plane frame: `{ "type": string, "payload": any }` (spec §6).
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    frame_type: String,
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct AddTaskPayload {
    url: String,
    #[serde(default)]
    depth: u32,
    #[serde(default)]
    priority: Option<f64>,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    query: String,
    #[serde(default)]
    limit: usize,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(rename = "type")]
    frame_type: &'static str,
    payload: StatsPayload,
}

#[derive(Debug, Serialize)]
struct StatsPayload {
    total_tasks: u64,
    total_results: u64,
    num_workers: usize,
    worker_stats: Vec<crate::model::WorkerStats>,
}

#[derive(Debug, Serialize)]
struct SearchResultsResponse {
    #[serde(rename = "type")]
    frame_type: &'static str,
    payload: SearchResultsPayload,
}

#[derive(Debug, Serialize)]
struct SearchResultsPayload {
    query: String,
    total: usize,
    results: Vec<SearchResultSummary>,
}

#[derive(Debug, Serialize)]
struct SearchResultSummary {
    url: String,
    title: String,
    snippet: String,
    score: f64,
}

/// Binds the control-plane Unix socket at `socket_path`, removing any stale socket file
/// left behind by a previous run, then accepts connections until `cancel` fires. Each
/// connection is handled on its own task; a listener accept error during shutdown exits
/// the loop cleanly instead of propagating (spec §4.11 failure semantics).
pub async fn serve(socket_path: String, master: Arc<CrawlMaster>, engine: Arc<SearchEngine>, cancel: CancellationToken) {
    let _ = std::fs::remove_file(&socket_path);
    let listener = match UnixListener::bind(Path::new(&socket_path)) {
        Ok(l) => l,
        Err(e) => {
            warn!(socket_path = %socket_path, error = %e, "failed to bind control-plane socket");
            return;
        }
    };
    info!(socket_path = %socket_path, "control-plane listening");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let master = master.clone();
                        let engine = engine.clone();
                        let cancel = cancel.clone();
                        tokio::spawn(handle_connection(stream, master, engine, cancel));
                    }
                    Err(e) => {
                        if cancel.is_cancelled() {
                            break;
                        }
                        warn!(error = %e, "control-plane accept error");
                    }
                }
            }
        }
    }

    let _ = std::fs::remove_file(&socket_path);
    info!("control-plane listener shut down");
}

async fn handle_connection(stream: UnixStream, master: Arc<CrawlMaster>, engine: Arc<SearchEngine>, cancel: CancellationToken) {
    let span = info_span!("ipc_connection");
    async move {
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break, // peer closed the connection.
                Err(e) => {
                    debug!(error = %e, "control-plane read error");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let frame = match decode_frame(&line) {
                Ok(f) => f,
                Err(e) => {
                    debug!(error = %e, "dropping malformed control-plane frame");
                    continue; // frame dropped, connection kept (spec §7).
                }
            };

            match frame.frame_type.as_str() {
                "ADD_TASK" => handle_add_task(&master, frame.payload),
                "BULK_ADD" => handle_bulk_add(&master, frame.payload),
                "GET_STATS" => {
                    let response = build_stats_response(&master);
                    write_response(&mut write_half, &response).await;
                }
                "SEARCH" => {
                    let response = handle_search(&engine, frame.payload);
                    write_response(&mut write_half, &response).await;
                }
                other => {
                    let e = IpcError::UnknownType(other.to_string());
                    debug!(error = %e, "ignoring unknown control-plane frame type");
                }
            }
        }
    }
    .instrument(span)
    .await
}

/// Decodes one line of the control-plane wire protocol into a `Frame` (spec §6).
fn decode_frame(line: &str) -> Result<Frame, IpcError> {
    Ok(serde_json::from_str(line)?)
}

/// Decodes a frame's `payload` into the shape a given handler expects.
fn decode_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, IpcError> {
    serde_json::from_value(payload).map_err(|e| IpcError::BadPayload(e.to_string()))
}

fn handle_add_task(master: &CrawlMaster, payload: Value) {
    match decode_payload::<AddTaskPayload>(payload) {
        Ok(p) => {
            let mut task = CrawlTask::new(p.url, p.depth, p.source.unwrap_or_else(|| "admin".to_string()));
            if let Some(priority) = p.priority {
                task = task.with_priority(priority);
            }
            master.add_task(task);
        }
        Err(e) => debug!(error = %e, "dropping malformed ADD_TASK payload"),
    }
}

fn handle_bulk_add(master: &CrawlMaster, payload: Value) {
    match decode_payload::<Vec<String>>(payload) {
        Ok(urls) => {
            master.bulk_add(urls);
        }
        Err(e) => debug!(error = %e, "dropping malformed BULK_ADD payload"),
    }
}

fn build_stats_response(master: &CrawlMaster) -> StatsResponse {
    StatsResponse {
        frame_type: "STATS",
        payload: StatsPayload {
            total_tasks: master.total_tasks(),
            total_results: master.total_results(),
            num_workers: master.num_workers(),
            worker_stats: master.worker_stats_snapshot(),
        },
    }
}

fn handle_search(engine: &SearchEngine, payload: Value) -> SearchResultsResponse {
    let parsed = decode_payload::<SearchPayload>(payload);
    let (query, limit) = match parsed {
        Ok(p) => (p.query, p.limit),
        Err(e) => {
            debug!(error = %e, "malformed SEARCH payload, treating as empty query");
            (String::new(), 0)
        }
    };

    let response = engine.search(&query, limit);
    SearchResultsResponse {
        frame_type: "SEARCH_RESULTS",
        payload: SearchResultsPayload {
            query: response.query,
            total: response.total,
            results: response
                .results
                .into_iter()
                .map(|r| SearchResultSummary { url: r.url, title: r.title, snippet: r.snippet, score: r.score })
                .collect(),
        },
    }
}

async fn write_response<T: Serialize>(write_half: &mut tokio::net::unix::OwnedWriteHalf, response: &T) {
    let Ok(mut line) = serde_json::to_string(response) else {
        return;
    };
    line.push('\n');
    if let Err(e) = write_response_line(write_half, line.as_bytes()).await {
        debug!(error = %e, "control-plane write error");
    }
}

async fn write_response_line(write_half: &mut tokio::net::unix::OwnedWriteHalf, line: &[u8]) -> Result<(), IpcError> {
    write_half.write_all(line).await.map_err(IpcError::Io)
}
