//! Quality heuristic (spec §4.1): a crude crawl-time signal from title length, content
//! length, domain authority, and a couple of spam tells. Base 0.5, clamped to [0,1].

const AD_MARKERS: &[&str] = &["advertisement", "click here"];

/// High-authority domains used for the +0.3 URL-allow-list bonus. Overridable via a CSV
/// file (spec §6); this is the compiled-in default.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "wikipedia.org",
    "rust-lang.org",
    "github.com",
    "stackoverflow.com",
    "bbc.com",
    "nytimes.com",
    "arxiv.org",
    "nature.com",
    "mozilla.org",
    "w3.org",
];

/// Loads one domain per CSV row from `path`, falling back to `DEFAULT_ALLOW_LIST` if
/// the file is missing, unreadable, or empty (spec §6). Never panics.
pub fn load_allow_list(path: Option<&str>) -> Vec<String> {
    let Some(path) = path else {
        return DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect();
    };

    let mut reader = match csv::ReaderBuilder::new().has_headers(false).from_path(path) {
        Ok(r) => r,
        Err(_) => return DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
    };

    let mut domains = Vec::new();
    for record in reader.records().flatten() {
        if let Some(domain) = record.get(0) {
            let domain = domain.trim().to_lowercase();
            if !domain.is_empty() {
                domains.push(domain);
            }
        }
    }

    if domains.is_empty() {
        DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect()
    } else {
        domains
    }
}

/// Scores `quality` in `[0,1]` for a page given its title, content, URL, and an
/// allow-list of high-authority domains.
pub fn score_quality(title: &str, content: &str, url: &str, allow_list: &[String]) -> f64 {
    let mut score = 0.5;

    let title_len = title.chars().count();
    if (10..=100).contains(&title_len) {
        score += 0.2;
    }

    if content.chars().count() > 500 {
        score += 0.2;
    }

    let lower_url = url.to_lowercase();
    if allow_list.iter().any(|domain| lower_url.contains(domain)) {
        score += 0.3;
    }

    let lower_content = content.to_lowercase();
    if AD_MARKERS.iter().any(|m| lower_content.contains(m)) {
        score -= 0.3;
    }

    score.clamp(0.0, 1.0)
}
