//! Synonym table (spec §6): `word: syn1, syn2, …` per line, loaded once at startup and
//! shared immutably afterward. Falls back to a compiled-in default on any I/O error.

use std::collections::HashMap;
use std::path::Path;

/// A handful of domain-relevant synonym groups. Not exhaustive — a sensible default so
/// the crate has no mandatory data-file dependency (spec §6).
const DEFAULT_SYNONYM_LINES: &[(&str, &[&str])] = &[
    ("rust", &["rustlang", "systems-language"]),
    ("programming", &["coding", "development", "software"]),
    ("crawler", &["spider", "scraper"]),
    ("search", &["lookup", "query", "find"]),
    ("index", &["catalog", "directory"]),
    ("fast", &["quick", "speedy", "rapid"]),
    ("error", &["bug", "fault", "defect"]),
    ("document", &["page", "article", "file"]),
    ("website", &["site", "webpage"]),
    ("concurrent", &["parallel", "simultaneous"]),
];

#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    table: HashMap<String, Vec<String>>,
}

impl SynonymMap {
    pub fn new(table: HashMap<String, Vec<String>>) -> Self {
        Self { table }
    }

    /// Synonyms for `word` longer than 2 characters, per spec §4.8's filter on the
    /// expanded terms.
    pub fn get(&self, word: &str) -> Vec<String> {
        self.table
            .get(word)
            .map(|syns| syns.iter().filter(|s| s.len() > 2).cloned().collect())
            .unwrap_or_default()
    }
}

pub fn default_synonyms() -> SynonymMap {
    let table = DEFAULT_SYNONYM_LINES
        .iter()
        .map(|(word, syns)| (word.to_string(), syns.iter().map(|s| s.to_string()).collect()))
        .collect();
    SynonymMap::new(table)
}

/// Loads `word: syn1, syn2, …` lines from `path`, falling back to the compiled-in
/// defaults if the file is missing, unreadable, or empty. Never panics.
pub fn load_synonyms(path: Option<&str>) -> SynonymMap {
    let Some(path) = path else {
        return default_synonyms();
    };
    match std::fs::read_to_string(Path::new(path)) {
        Ok(contents) => {
            let mut table = HashMap::new();
            for line in contents.lines() {
                let Some((word, rest)) = line.split_once(':') else {
                    continue;
                };
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                let syns: Vec<String> = rest
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !syns.is_empty() {
                    table.insert(word, syns);
                }
            }
            if table.is_empty() {
                default_synonyms()
            } else {
                SynonymMap::new(table)
            }
        }
        Err(_) => default_synonyms(),
    }
}
