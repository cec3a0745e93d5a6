//! The ranking subsystem: query analysis, candidate retrieval, multi-signal scoring,
//! snippet generation, and per-query caching (spec §4.8-§4.11).

pub mod analyzer;
pub mod cache;
pub mod engine;
pub mod fuzzy;
pub mod ranker;
pub mod retrieval;
pub mod snippet;
pub mod synonyms;

pub use engine::{SearchEngine, SearchResponse, SearchResultDto};
