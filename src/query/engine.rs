//! Search orchestration (spec §4.8-§4.11/§6): ties the analyzer, retrieval, ranker,
//! snippet generator, and query cache together behind one `SearchEngine::search` call.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QueryError;
use crate::index::idf::IdfCache;
use crate::index::store::InvertedIndex;
use crate::query::analyzer::{self, AnalyzedQuery};
use crate::query::cache::QueryCache;
use crate::query::fuzzy::BkTree;
use crate::query::ranker;
use crate::query::snippet::build_snippet;
use crate::query::synonyms::SynonymMap;

const DEFAULT_LIMIT: usize = 10;
const SNIPPET_MAX_LEN: usize = 280;

/// One ranked search hit (spec §6 query response DTO).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultDto {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
    pub rank: usize,
}

/// Full query response (spec §6). `time_taken` is a human-readable duration string,
/// frozen at the moment the response was first computed — a cache hit replays the
/// original response verbatim so repeated identical queries are byte-equal (spec §8).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub time_taken: String,
}

impl SearchResponse {
    fn empty(query: &str, elapsed: Duration) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            time_taken: format!("{elapsed:.2?}"),
        }
    }
}

pub struct SearchEngine {
    index: Arc<InvertedIndex>,
    idf: IdfCache,
    cache: QueryCache<SearchResponse>,
    synonyms: SynonymMap,
    stop_words: Arc<HashSet<String>>,
}

impl SearchEngine {
    pub fn new(index: Arc<InvertedIndex>, stop_words: Arc<HashSet<String>>, synonyms: SynonymMap, cache_ttl: Duration) -> Self {
        Self { index, idf: IdfCache::new(), cache: QueryCache::new(cache_ttl), synonyms, stop_words }
    }

    /// `SEARCH` (spec §4.8-§4.11/§6). Never panics or propagates a query-side error to
    /// the caller; degrades to an empty result set instead (spec §7).
    pub fn search(&self, query: &str, limit: usize) -> SearchResponse {
        let start = Instant::now();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchResponse::empty(query, start.elapsed());
        }

        if let Some(cached) = self.cache.get(trimmed) {
            return cached;
        }

        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let vocabulary = BkTree::from_terms(self.index.terms());
        let analyzed = match self.analyze_query(trimmed, &vocabulary) {
            Ok(analyzed) => analyzed,
            Err(e) => {
                debug!(error = %e, "query analysis produced no usable terms");
                let response = SearchResponse::empty(query, start.elapsed());
                self.cache.put(trimmed, response.clone());
                return response;
            }
        };

        let candidates = crate::query::retrieval::retrieve(&analyzed.terms, &self.index, &self.idf, &vocabulary);
        let ranked = ranker::rank(candidates, trimmed, &analyzed.terms, &self.index, &self.synonyms);

        let total = ranked.len();
        let total_pages = total.div_ceil(limit.max(1));

        let results: Vec<SearchResultDto> = ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, c)| SearchResultDto {
                url: c.url,
                title: c.title,
                snippet: build_snippet(&c.content, &analyzed.terms, SNIPPET_MAX_LEN),
                score: c.score,
                rank: i + 1,
            })
            .collect();

        let response = SearchResponse {
            query: query.to_string(),
            results,
            total,
            page: 1,
            total_pages,
            time_taken: format!("{:.2?}", start.elapsed()),
        };

        self.cache.put(trimmed, response.clone());
        response
    }

    /// Runs the analyzer and rejects a query that expanded to no usable terms (spec
    /// §7's `EmptyQuery`), so callers can propagate with `?` instead of re-checking
    /// `terms.is_empty()` themselves.
    fn analyze_query(&self, trimmed: &str, vocabulary: &BkTree) -> Result<AnalyzedQuery, QueryError> {
        let analyzed = analyzer::analyze(trimmed, &self.stop_words, &self.synonyms, vocabulary);
        if analyzed.terms.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(analyzed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::query::synonyms::default_synonyms;
    use crate::text::stopwords::default_stop_words;

    fn engine_with(docs: &[(&str, &str, &str)]) -> SearchEngine {
        let index = Arc::new(InvertedIndex::new(Arc::new(default_stop_words())));
        for (url, title, content) in docs {
            let id = index.doc_id_for_url(url);
            index.add_document(Document {
                id,
                url: url.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                length: content.split_whitespace().count(),
                pagerank: 0.0,
                quality: 0.5,
            });
        }
        SearchEngine::new(index, Arc::new(default_stop_words()), default_synonyms(), Duration::from_secs(300))
    }

    #[test]
    fn empty_corpus_search_returns_no_results_fast() {
        let engine = engine_with(&[]);
        let start = Instant::now();
        let response = engine.search("anything", 10);
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn single_term_hit_produces_a_scored_snippet_result() {
        let engine = engine_with(&[(
            "https://a.example/",
            "Rust programming language",
            "rust is great, rust is fast, and rust has a helpful community",
        )]);
        let response = engine.search("rust", 10);
        assert_eq!(response.results.len(), 1);
        assert!(response.results[0].score > 0.0);
        assert!(response.results[0].snippet.to_lowercase().contains("<b>rust</b>"));
    }

    #[test]
    fn identical_queries_within_ttl_are_byte_equal() {
        let engine = engine_with(&[("https://a.example/", "Rust programming language", "rust systems programming")]);
        let first = engine.search("rust", 10);
        let second = engine.search("rust", 10);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_query_returns_empty_response() {
        let engine = engine_with(&[("https://a.example/", "Rust", "rust content")]);
        let response = engine.search("   ", 10);
        assert_eq!(response.total, 0);
    }

    #[test]
    fn all_stopword_query_hits_the_empty_query_error_path() {
        let engine = engine_with(&[("https://a.example/", "Rust", "rust content")]);
        // Analysis drops every token, exercising the `QueryError::EmptyQuery` path
        // rather than the earlier blank-string short-circuit.
        let response = engine.search("the this that with", 10);
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
    }
}
