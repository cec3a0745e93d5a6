//! Typed error enums for each subsystem boundary. Every internal function returns a
//! `Result<T, E>` in one of these and propagates with `?`; none of them panics the process.

use thiserror::Error;

/// Errors surfaced while fetching and parsing a single page during a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("fetch timed out")]
    FetchTimeout,

    #[error("fetch network error: {0}")]
    FetchNetwork(String),

    #[error("fetch returned HTTP {0}")]
    FetchHttpStatus(u16),

    #[error("response body could not be parsed")]
    ParseMalformed,

    #[error("task queue is full")]
    QueueFull,

    #[error("shutdown in progress")]
    ShutdownInProgress,
}

/// Errors surfaced by the inverted index / document store.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no such term in the index")]
    NoSuchTerm,

    #[error("document not found for id {0:?}")]
    NoSuchDocument(crate::model::DocId),
}

/// Errors surfaced by the query analyzer / ranker. These never propagate to the IPC
/// caller as exceptions — query-side failures degrade to an empty result set (spec §7).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors surfaced while decoding or dispatching a single control-plane frame.
/// A `IpcError` is always scoped to one frame; it never tears down the connection.
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("frame was not valid JSON: {0}")]
    FrameInvalid(#[from] serde_json::Error),

    #[error("unknown frame type {0:?}")]
    UnknownType(String),

    #[error("frame payload did not match the expected shape: {0}")]
    BadPayload(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
