//! Process-wide configuration, loaded once at startup and shared behind an `Arc`.
//!
//! CLI argument parsing is an explicit out-of-scope collaborator (spec §1), so overrides
//! come from environment variables only. Every default named in the spec lives here.

use std::env;
use std::time::Duration;

/// The ten built-in high-authority seed URLs (spec §6). Chosen for broad topical coverage
/// (encyclopedic, technical docs, and news) so an initial crawl touches varied content.
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://en.wikipedia.org/wiki/Main_Page",
    "https://en.wikipedia.org/wiki/Computer_science",
    "https://www.rust-lang.org/",
    "https://doc.rust-lang.org/book/",
    "https://news.ycombinator.com/",
    "https://github.com/rust-lang/rust",
    "https://stackoverflow.com/questions/tagged/rust",
    "https://www.bbc.com/news",
    "https://www.nytimes.com/",
    "https://arxiv.org/",
];

#[derive(Debug, Clone)]
pub struct Config {
    /// Worker pool size. Defaults to 4x hardware parallelism (spec §4.3).
    pub num_workers: usize,
    /// Task/result channel capacity is `num_workers * channel_capacity_multiplier`.
    pub channel_capacity_multiplier: usize,
    /// Per-fetch wall timeout (spec §4.2).
    pub fetch_timeout: Duration,
    /// Body read cap in bytes (spec §4.2).
    pub fetch_max_bytes: usize,
    /// Interval between monitor tallies (spec §4.3).
    pub monitor_interval: Duration,
    /// Control-plane Unix domain socket path (spec §6).
    pub socket_path: String,
    /// Per-query result cache TTL (spec §4.11).
    pub cache_ttl: Duration,
    /// PageRank damping factor `d` (spec §4.7).
    pub pagerank_damping: f64,
    /// Fixed PageRank iteration count (spec §4.7).
    pub pagerank_iterations: usize,
    /// Seed URLs enqueued by the seeder task at startup (spec §4.3).
    pub seed_urls: Vec<String>,
    /// Optional override path for the stop-word list (spec §6).
    pub stop_words_path: Option<String>,
    /// Optional override path for the synonym map (spec §6).
    pub synonyms_path: Option<String>,
    /// Optional override path for the high-authority allow-list CSV (spec §6).
    pub allow_list_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let num_workers = 4 * std::thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            num_workers,
            channel_capacity_multiplier: 10,
            fetch_timeout: Duration::from_secs(15),
            fetch_max_bytes: 2 * 1024 * 1024,
            monitor_interval: Duration::from_secs(30),
            socket_path: "/tmp/hyperweave.sock".to_string(),
            cache_ttl: Duration::from_secs(5 * 60),
            pagerank_damping: 0.85,
            pagerank_iterations: 50,
            seed_urls: DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect(),
            stop_words_path: None,
            synonyms_path: None,
            allow_list_path: None,
        }
    }
}

impl Config {
    /// Task/result channel capacity, per spec §4.3/§5.
    pub fn channel_capacity(&self) -> usize {
        self.num_workers * self.channel_capacity_multiplier
    }

    /// Builds a `Config` from defaults, overridden by any recognized environment
    /// variable. Malformed values are ignored (the default stands), never panicking.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_usize("HYPERWEAVE_NUM_WORKERS") {
            cfg.num_workers = v;
        }
        if let Some(v) = env_usize("HYPERWEAVE_CHANNEL_CAPACITY_MULTIPLIER") {
            cfg.channel_capacity_multiplier = v;
        }
        if let Some(v) = env_u64("HYPERWEAVE_FETCH_TIMEOUT_SECS") {
            cfg.fetch_timeout = Duration::from_secs(v);
        }
        if let Some(v) = env_usize("HYPERWEAVE_FETCH_MAX_BYTES") {
            cfg.fetch_max_bytes = v;
        }
        if let Some(v) = env_u64("HYPERWEAVE_MONITOR_INTERVAL_SECS") {
            cfg.monitor_interval = Duration::from_secs(v);
        }
        if let Ok(v) = env::var("HYPERWEAVE_SOCKET_PATH") {
            cfg.socket_path = v;
        }
        if let Some(v) = env_u64("HYPERWEAVE_CACHE_TTL_SECS") {
            cfg.cache_ttl = Duration::from_secs(v);
        }
        if let Some(v) = env_f64("HYPERWEAVE_PAGERANK_DAMPING") {
            cfg.pagerank_damping = v;
        }
        if let Some(v) = env_usize("HYPERWEAVE_PAGERANK_ITERATIONS") {
            cfg.pagerank_iterations = v;
        }
        if let Ok(v) = env::var("HYPERWEAVE_SEED_URLS") {
            let seeds: Vec<String> = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
            if !seeds.is_empty() {
                cfg.seed_urls = seeds;
            }
        }
        cfg.stop_words_path = env::var("HYPERWEAVE_STOP_WORDS_PATH").ok();
        cfg.synonyms_path = env::var("HYPERWEAVE_SYNONYMS_PATH").ok();
        cfg.allow_list_path = env::var("HYPERWEAVE_ALLOW_LIST_PATH").ok();

        cfg
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
