//! The concurrent document store and inverted index (spec §3/§4.6/§9).
//!
//! Three maps form the arena: `docs` (DocId -> Document, the source of truth),
//! `url_to_id` (URL -> DocId, for dedup and link-graph resolution), and `postings`
//! (term -> Vec<Posting>, one `RwLock` per term so writers to the same term serialize
//! while writers to different terms never block each other). All three are
//! `dashmap::DashMap`, which shards internally and gives lock-free concurrent reads.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::IndexError;
use crate::model::{DocId, Document, Posting};
use crate::text::tokenize::tokenize_for_index;

/// Directed link graph over `DocId`s, restricted to URLs present in the corpus
/// (spec §3). Parallel edges collapse because `dashmap::DashSet` dedups the target set.
#[derive(Default)]
pub struct LinkGraph {
    out_edges: DashMap<DocId, dashmap::DashSet<DocId>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&self, from: DocId, to: DocId) {
        self.out_edges.entry(from).or_default().insert(to);
    }

    pub fn outlinks(&self, from: DocId) -> Vec<DocId> {
        self.out_edges
            .get(&from)
            .map(|set| set.iter().map(|e| *e).collect())
            .unwrap_or_default()
    }

    pub fn out_degree(&self, from: DocId) -> usize {
        self.out_edges.get(&from).map(|set| set.len()).unwrap_or(0)
    }
}

pub struct InvertedIndex {
    docs: DashMap<DocId, Document>,
    url_to_id: DashMap<String, DocId>,
    postings: DashMap<String, RwLock<Vec<Posting>>>,
    pub links: LinkGraph,
    next_id: AtomicU64,
    stop_words: Arc<HashSet<String>>,
}

impl InvertedIndex {
    pub fn new(stop_words: Arc<HashSet<String>>) -> Self {
        Self {
            docs: DashMap::new(),
            url_to_id: DashMap::new(),
            postings: DashMap::new(),
            links: LinkGraph::new(),
            next_id: AtomicU64::new(0),
            stop_words,
        }
    }

    /// Returns the `DocId` for `url`, assigning a fresh one on first sight.
    pub fn doc_id_for_url(&self, url: &str) -> DocId {
        if let Some(id) = self.url_to_id.get(url) {
            return *id;
        }
        let id = DocId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.url_to_id.entry(url.to_string()).or_insert(id);
        // Another writer may have raced us; prefer whatever is actually stored.
        *self.url_to_id.get(url).expect("just inserted")
    }

    /// Looks up the `DocId` for `url` without assigning one.
    pub fn existing_doc_id(&self, url: &str) -> Option<DocId> {
        self.url_to_id.get(url).map(|id| *id)
    }

    pub fn document(&self, id: DocId) -> Option<Document> {
        self.docs.get(&id).map(|d| d.clone())
    }

    pub fn document_by_url(&self, url: &str) -> Option<Document> {
        self.existing_doc_id(url).and_then(|id| self.document(id))
    }

    /// Like `document`, but for callers that treat a missing document as an invariant
    /// violation (e.g. a posting referencing a `DocId` no longer in the arena) rather
    /// than a normal lookup miss (spec §10 typed error model).
    pub fn require_document(&self, id: DocId) -> Result<Document, IndexError> {
        self.document(id).ok_or(IndexError::NoSuchDocument(id))
    }

    pub fn total_documents(&self) -> usize {
        self.docs.len()
    }

    pub fn all_doc_ids(&self) -> Vec<DocId> {
        self.docs.iter().map(|e| *e.key()).collect()
    }

    /// `AddDocument` (spec §4.6): stores the document (creating or replacing in place),
    /// then tokenizes `title + " " + content`, drops stop words and short tokens, and
    /// updates postings for each surviving term.
    pub fn add_document(&self, doc: Document) {
        let id = doc.id;
        let title_lower = doc.title.to_lowercase();
        let combined = format!("{} {}", doc.title, doc.content);
        let length = doc.length.max(1) as f64;
        let pagerank = doc.pagerank;

        self.docs.insert(id, doc);

        let mut counts: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
        for tok in tokenize_for_index(&combined, &self.stop_words) {
            *counts.entry(tok).or_insert(0) += 1;
        }

        for (term, count) in counts {
            let tf = count as f64 / length;
            let mut score = tf * (1.0 + pagerank);
            if title_lower.contains(term.as_str()) {
                score *= 2.0;
            }
            self.upsert_posting(&term, id, score);
        }
    }

    /// Replaces the posting for `(term, doc_id)` if present, otherwise appends one.
    /// Writers to the same term serialize on that term's `RwLock`; writers to
    /// different terms never contend.
    fn upsert_posting(&self, term: &str, doc_id: DocId, score: f64) {
        let entry = self.postings.entry(term.to_string()).or_default();
        let mut list = entry.write().expect("postings lock poisoned");
        match list.iter_mut().find(|p| p.doc_id == doc_id) {
            Some(p) => p.score = score,
            None => list.push(Posting { doc_id, score }),
        }
    }

    pub fn postings_for(&self, term: &str) -> Option<Vec<Posting>> {
        self.postings.get(term).map(|l| l.read().expect("postings lock poisoned").clone())
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map(|l| l.read().expect("postings lock poisoned").len()).unwrap_or(0)
    }

    /// All terms currently in the index. Used for stem/fuzzy fallback and the bounded
    /// substring scan (spec §4.9).
    pub fn terms(&self) -> Vec<String> {
        self.postings.iter().map(|e| e.key().clone()).collect()
    }

    /// Sorts every term's postings by descending score. Spec §4.6 requires this before
    /// persistence at the end of `BuildIndex`; live operation does not require it.
    pub fn sort_all_postings(&self) {
        for entry in self.postings.iter() {
            let mut list = entry.value().write().expect("postings lock poisoned");
            list.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        }
    }

    /// Overwrites every document's `pagerank` field with freshly computed values,
    /// leaving `quality` untouched (spec §9 open-question decision).
    pub fn apply_pagerank(&self, ranks: &std::collections::HashMap<DocId, f64>) {
        for mut entry in self.docs.iter_mut() {
            if let Some(&rank) = ranks.get(entry.key()) {
                entry.value_mut().pagerank = rank;
            }
        }
    }
}
