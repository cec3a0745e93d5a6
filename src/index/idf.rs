//! IDF cache (spec §4.11): `ln(N / df(T))`, cached per term and recomputed on
//! index (re)load. Terms longer than 5 characters get a 1.2x multiplier.

use dashmap::DashMap;

use crate::index::store::InvertedIndex;

const LONG_TERM_THRESHOLD: usize = 5;
const LONG_TERM_MULTIPLIER: f64 = 1.2;

#[derive(Default)]
pub struct IdfCache {
    cache: DashMap<String, f64>,
}

impl IdfCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached IDF for `term`, computing and caching it from `index` if absent.
    pub fn get(&self, term: &str, index: &InvertedIndex) -> f64 {
        if let Some(v) = self.cache.get(term) {
            return *v;
        }
        let value = Self::compute(term, index);
        self.cache.insert(term.to_string(), value);
        value
    }

    fn compute(term: &str, index: &InvertedIndex) -> f64 {
        let n = index.total_documents() as f64;
        let df = index.document_frequency(term) as f64;
        if n <= 0.0 || df <= 0.0 {
            return 0.0;
        }
        let mut idf = (n / df).ln();
        if term.len() > LONG_TERM_THRESHOLD {
            idf *= LONG_TERM_MULTIPLIER;
        }
        idf
    }

    /// Drops all cached values; called when the index is rebuilt/reloaded so stale IDF
    /// values don't outlive the corpus that produced them.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::text::stopwords::default_stop_words;
    use std::sync::Arc;

    fn index_with_docs(n: usize, term_in: usize) -> InvertedIndex {
        let idx = InvertedIndex::new(Arc::new(default_stop_words()));
        for i in 0..n {
            let url = format!("https://example.com/{i}");
            let id = idx.doc_id_for_url(&url);
            let content = if i < term_in {
                "rust systems programming language example".to_string()
            } else {
                "completely different words without the target".to_string()
            };
            idx.add_document(Document {
                id,
                url,
                title: "doc".to_string(),
                content,
                length: 6,
                pagerank: 0.0,
                quality: 0.5,
            });
        }
        idx
    }

    #[test]
    fn idf_matches_ln_formula() {
        let idx = index_with_docs(10, 2);
        let cache = IdfCache::new();
        let idf = cache.get("rust", &idx);
        let expected = (10.0_f64 / 2.0).ln();
        assert!((idf - expected).abs() < 1e-9);
    }

    #[test]
    fn long_terms_get_multiplier() {
        let idx = index_with_docs(10, 2);
        let cache = IdfCache::new();
        // "systems" has 7 chars (> 5), should carry the 1.2x multiplier.
        let idf = cache.get("systems", &idx);
        let expected = (10.0_f64 / 2.0).ln() * 1.2;
        assert!((idf - expected).abs() < 1e-9);
    }

    #[test]
    fn unseen_term_has_zero_idf() {
        let idx = index_with_docs(10, 2);
        let cache = IdfCache::new();
        assert_eq!(cache.get("nonexistent", &idx), 0.0);
    }

    #[test]
    fn invalidate_clears_cache() {
        let idx = index_with_docs(10, 2);
        let cache = IdfCache::new();
        let _ = cache.get("rust", &idx);
        cache.invalidate();
        assert!(cache.cache.is_empty());
    }
}
