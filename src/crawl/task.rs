//! Task-level helpers: the URL fingerprint used for dedup (spec §4.3) and `isValidURL`
//! (spec §4.5).

/// Deterministic 32-bit polynomial fingerprint of a URL: `hash = hash*31 + code_point`.
pub fn url_fingerprint(url: &str) -> u32 {
    let mut hash: u32 = 0;
    for c in url.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as u32);
    }
    hash
}

/// Outlink extensions/substrings that are never worth crawling: social-media share
/// widgets and large binary downloads (spec §4.5).
const BLOCKED_SUBSTRINGS: &[&str] = &[
    "facebook.com", "twitter.com", "x.com", "instagram.com", "tiktok.com", "linkedin.com/share",
    "pinterest.com", "reddit.com/submit",
    ".zip", ".tar.gz", ".tar", ".rar", ".7z", ".exe", ".dmg", ".iso",
    ".mp4", ".mp3", ".avi", ".mov", ".pdf", ".png", ".jpg", ".jpeg", ".gif",
];

const MAX_URL_LEN: usize = 2000;

/// `isValidURL` (spec §4.5): scheme `http`/`https`, length <= 2000, none of the
/// blocked substrings.
pub fn is_valid_url(url: &str) -> bool {
    if url.len() > MAX_URL_LEN {
        return false;
    }
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let lower = url.to_lowercase();
    !BLOCKED_SUBSTRINGS.iter().any(|s| lower.contains(s))
}
