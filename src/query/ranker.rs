//! Multi-signal ranking (spec §4.10): combines the provisional retrieval score with
//! title/content/position/quality signals into a single final score, then drops, sorts,
//! and dedups the candidate list.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::index::store::InvertedIndex;
use crate::model::DocId;
use crate::query::synonyms::SynonymMap;

const MIN_SCORE: f64 = 0.1;

const GENERIC_TITLES: &[&str] = &["home", "index", "untitled", "welcome", "page not found"];
const OFF_TOPIC_TITLE_MARKERS: &[&str] = &["hacker news", "ycombinator"];
const PENALTY_MARKERS: &[&str] = &["404", "not found", "lorem ipsum"];
const POSITIVE_CONTENT_MARKERS: &[&str] = &["introduction", "overview", "guide", "tutorial"];
const NEGATIVE_CONTENT_MARKERS: &[&str] = &["click here", "advertisement"];

pub struct RankedCandidate {
    pub doc_id: DocId,
    pub url: String,
    pub title: String,
    pub content: String,
    pub score: f64,
}

fn term_count(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    haystack.matches(term).count()
}

/// Scores one candidate document against the analyzed query, per spec §4.10's
/// itemized signals, returning the raw (pre-`/10`) sum.
fn score_candidate(
    retrieval_score: f64,
    title: &str,
    content: &str,
    original_query: &str,
    query_terms: &[String],
    synonyms: &SynonymMap,
) -> f64 {
    let title_lower = title.to_lowercase();
    let content_lower = content.to_lowercase();
    let query_lower = original_query.to_lowercase();
    let word_count = content_lower.split_whitespace().count().max(1);

    let mut score = retrieval_score;

    if title_lower.contains(&query_lower) {
        score += 50.0;
    }
    if content_lower.contains(&query_lower) {
        score += 25.0;
    }

    let mut term_matches = 0.0;
    let mut present = 0usize;
    let mut semantic = 0.0;
    for term in query_terms {
        let title_count = term_count(&title_lower, term);
        let content_count = term_count(&content_lower, term);
        term_matches += (title_count * 15 + content_count * 3) as f64;
        if title_count > 0 || content_count > 0 {
            present += 1;
        }
        for syn in synonyms.get(term) {
            if title_lower.contains(&syn) {
                semantic += 8.0;
            }
            if content_lower.contains(&syn) {
                semantic += 2.0;
            }
        }
    }
    score += term_matches;
    score += semantic;

    let k = query_terms.len();
    if k > 0 {
        if present == k {
            score += 20.0;
        } else if present * 2 >= k {
            score += 10.0;
        }
    }

    let title_len = title_lower.chars().count();
    if (10..=100).contains(&title_len) {
        score += 5.0;
    }
    if GENERIC_TITLES.iter().any(|g| title_lower.trim() == *g) {
        score -= 20.0;
    }
    if OFF_TOPIC_TITLE_MARKERS.iter().any(|m| title_lower.contains(m)) && !OFF_TOPIC_TITLE_MARKERS.iter().any(|m| query_lower.contains(m)) {
        score -= 50.0;
    }
    if title_len > 150 {
        score -= 10.0;
    }

    let occurrences: usize = query_terms.iter().map(|t| term_count(&content_lower, t)).sum();
    let density = occurrences as f64 / word_count as f64 * 100.0;
    if density > 5.0 {
        score += 15.0;
    } else if density > 2.0 {
        score += 10.0;
    } else if density > 0.5 {
        score += 5.0;
    }
    if word_count < 50 {
        score -= 5.0;
    }

    for term in query_terms {
        if let Some(pos) = content_lower.find(term.as_str()) {
            let fraction = pos as f64 / content_lower.len().max(1) as f64;
            if fraction < 0.10 {
                score += 8.0;
            } else if fraction < 0.30 {
                score += 5.0;
            } else if fraction < 0.50 {
                score += 2.0;
            }
        }
    }

    if content_lower.chars().count() > 2000 {
        score += 8.0;
    } else if content_lower.chars().count() > 500 {
        score += 4.0;
    }
    let unique_ratio = {
        let words: Vec<&str> = content_lower.split_whitespace().collect();
        let unique: HashSet<&str> = words.iter().copied().collect();
        if words.is_empty() { 0.0 } else { unique.len() as f64 / words.len() as f64 }
    };
    if unique_ratio > 0.6 {
        score += 5.0;
    } else if unique_ratio > 0.4 {
        score += 2.0;
    }
    if POSITIVE_CONTENT_MARKERS.iter().any(|m| content_lower.contains(m)) {
        score += 3.0;
    }
    if NEGATIVE_CONTENT_MARKERS.iter().any(|m| content_lower.contains(m)) {
        score -= 10.0;
    }

    if PENALTY_MARKERS.iter().any(|m| content_lower.contains(m)) {
        score -= 30.0;
    }
    if content_lower.chars().count() > 2000 && k > 0 && present * 2 < k {
        score -= 20.0;
    }

    score
}

/// Ranks `candidates` against the analyzed query, dropping scores below 0.1/10,
/// sorting by score descending (ties by insertion order), and removing documents whose
/// case-folded, trimmed title duplicates one already kept.
pub fn rank(
    candidates: HashMap<DocId, f64>,
    original_query: &str,
    query_terms: &[String],
    index: &InvertedIndex,
    synonyms: &SynonymMap,
) -> Vec<RankedCandidate> {
    let mut scored: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter_map(|(doc_id, retrieval_score)| {
            let doc = match index.require_document(doc_id) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(error = %e, "postings referenced a document no longer in the arena");
                    return None;
                }
            };
            let raw = score_candidate(retrieval_score, &doc.title, &doc.content, original_query, query_terms, synonyms);
            let final_score = (raw.max(0.0)) / 10.0;
            if final_score < MIN_SCORE {
                return None;
            }
            Some(RankedCandidate { doc_id, url: doc.url, title: doc.title, content: doc.content, score: final_score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut seen_titles = HashSet::new();
    scored.retain(|c| seen_titles.insert(c.title.trim().to_lowercase()));
    scored
}
