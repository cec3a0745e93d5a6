//! Candidate retrieval (spec §4.9): exact/stem/fuzzy postings lookup, weighted
//! accumulation, and the multi-term coverage filter.

use std::collections::HashMap;

use crate::index::idf::IdfCache;
use crate::index::store::InvertedIndex;
use crate::model::DocId;
use crate::query::fuzzy::BkTree;
use crate::text::tokenize::stem;

const EXACT_WEIGHT: f64 = 2.0;
const STEM_WEIGHT: f64 = 1.5;
const FUZZY_WEIGHT: f64 = 0.8;
/// Weight for the bounded substring scan fallback (spec §4.9's "may perform a bounded
/// scan"); not itself pinned to a value by the spec, kept conservatively below fuzzy.
const SUBSTRING_WEIGHT: f64 = 0.5;
const FUZZY_MAX_DISTANCE: usize = 2;
/// Cap on how many vocabulary terms the bounded substring scan inspects.
const SUBSTRING_SCAN_LIMIT: usize = 50;

/// Looks up postings for `term`, falling back to its stem, then to fuzzy matches
/// against `vocabulary`, accumulating `idf(term) * posting.score * weight` per
/// candidate `DocId` into `scores`.
fn accumulate_term(term: &str, index: &InvertedIndex, idf: &IdfCache, vocabulary: &BkTree, scores: &mut HashMap<DocId, f64>) {
    if let Some(postings) = index.postings_for(term) {
        let term_idf = idf.get(term, index);
        for p in postings {
            *scores.entry(p.doc_id).or_insert(0.0) += term_idf * p.score * EXACT_WEIGHT;
        }
        return;
    }

    let stemmed = stem(term);
    if stemmed != term {
        if let Some(postings) = index.postings_for(&stemmed) {
            let term_idf = idf.get(&stemmed, index);
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += term_idf * p.score * STEM_WEIGHT;
            }
            return;
        }
    }

    for (matched, _) in vocabulary.find_within(term, FUZZY_MAX_DISTANCE) {
        if let Some(postings) = index.postings_for(&matched) {
            let term_idf = idf.get(&matched, index);
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += term_idf * p.score * FUZZY_WEIGHT;
            }
        }
    }
}

/// Bounded substring scan (spec §4.9): used only when a single-term query's analyzer
/// produced zero candidates. Inspects at most `SUBSTRING_SCAN_LIMIT` vocabulary terms.
fn substring_scan(term: &str, index: &InvertedIndex, idf: &IdfCache, scores: &mut HashMap<DocId, f64>) {
    for candidate in index.terms().into_iter().filter(|t| t.contains(term)).take(SUBSTRING_SCAN_LIMIT) {
        if let Some(postings) = index.postings_for(&candidate) {
            let term_idf = idf.get(&candidate, index);
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += term_idf * p.score * SUBSTRING_WEIGHT;
            }
        }
    }
}

fn coverage_threshold(k: usize) -> usize {
    if k >= 4 {
        (4 * k).div_ceil(5) // ceil(0.8 * k) without floating point.
    } else if k == 3 {
        2
    } else {
        k
    }
}

/// Counts distinct `query_terms` found as substrings of the document's lowercased
/// title or content.
fn coverage_count(doc_title: &str, doc_content: &str, query_terms: &[String]) -> usize {
    let title = doc_title.to_lowercase();
    let content = doc_content.to_lowercase();
    query_terms.iter().filter(|t| title.contains(t.as_str()) || content.contains(t.as_str())).count()
}

/// Runs candidate retrieval over `query_terms`, returning a provisional per-document
/// score map. Applies the multi-term coverage filter; falls back to the unfiltered set
/// if filtering would empty it, and to a bounded substring scan for single-term queries
/// with zero candidates.
pub fn retrieve(query_terms: &[String], index: &InvertedIndex, idf: &IdfCache, vocabulary: &BkTree) -> HashMap<DocId, f64> {
    let mut scores = HashMap::new();
    for term in query_terms {
        accumulate_term(term, index, idf, vocabulary, &mut scores);
    }

    if scores.is_empty() && query_terms.len() == 1 {
        substring_scan(&query_terms[0], index, idf, &mut scores);
    }

    if query_terms.len() < 2 || scores.is_empty() {
        return scores;
    }

    let threshold = coverage_threshold(query_terms.len());
    let filtered: HashMap<DocId, f64> = scores
        .iter()
        .filter(|(doc_id, _)| {
            index
                .document(**doc_id)
                .map(|doc| coverage_count(&doc.title, &doc.content, query_terms) >= threshold)
                .unwrap_or(false)
        })
        .map(|(id, score)| (*id, *score))
        .collect();

    if filtered.is_empty() { scores } else { filtered }
}
