//! Small text utilities shared by the normalizer and clusterer stages.
//!
//! Pure functions only — no I/O, no stage-specific state.

use std::collections::HashSet;

/// Collapse runs of whitespace to a single space and trim the ends.
///
/// ```
/// assert_eq!(narrative_common::text::normalize_ws("  Foo   Bar  "), "Foo Bar");
/// ```
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "for", "is", "are", "was",
    "were", "be", "been", "with", "at", "by", "from", "as", "that", "this", "it", "its", "has",
    "have", "had", "will", "would", "can", "could", "not", "no", "into", "over", "after", "about",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercase, strip punctuation, and split into word tokens. Stopwords are
/// dropped. Used both for near-duplicate Jaccard comparison and as the base
/// tokenization for TF-IDF vectorization.
pub fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity over the distinct token sets of two strings, after
/// stopword removal. Used for near-duplicate title comparison (spec §4.1).
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let ta: HashSet<String> = tokenize(a).into_iter().collect();
    let tb: HashSet<String> = tokenize(b).into_iter().collect();
    jaccard(&ta, &tb)
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Title-case a word for label generation (spec §4.2): uppercase the first
/// alphabetic character, lowercase the rest.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Round to 3 fractional digits, matching the stable JSON encoding contract
/// in spec §6 (`RunArtifact` floats round-trip with 3 decimal places).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
