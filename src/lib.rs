//! hyperweave: a concurrent web crawler, in-memory inverted index with PageRank, and
//! ranked query engine (spec §1-§2), exposed as a library behind a thin binary
//! composition root (`main.rs`).

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod index;
pub mod ipc;
pub mod model;
pub mod query;
pub mod text;
