//! The concurrent crawl pipeline: task-level helpers, the crawl master, the worker
//! pool, and the result consumer (spec §4.3-§4.5).

pub mod consumer;
pub mod master;
pub mod task;
pub mod worker;

pub use master::CrawlMaster;
