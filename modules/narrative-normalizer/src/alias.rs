//! Entity resolution via alias-table matching (spec §4.1): scan
//! `title ∪ text`, case-insensitive, word-boundary anchored, against the
//! configured surface forms for each canonical name.

use std::collections::BTreeSet;

use narrative_types::config::AliasTable;

/// Return every canonical entity whose alias (or canonical name itself)
/// appears as a whole word in `haystack`. Matching is case-insensitive;
/// duplicate matches within the same haystack collapse via the `BTreeSet`.
pub fn resolve_entities(haystack: &str, aliases: &AliasTable) -> BTreeSet<String> {
    let haystack_lower = haystack.to_lowercase();
    let mut found = BTreeSet::new();

    for (canonical, surface_forms) in &aliases.0 {
        let matches_canonical = contains_word(&haystack_lower, &canonical.to_lowercase());
        let matches_alias = surface_forms
            .iter()
            .any(|alias| contains_word(&haystack_lower, &alias.to_lowercase()));
        if matches_canonical || matches_alias {
            found.insert(canonical.clone());
        }
    }

    found
}

/// Whether `needle` occurs in `haystack` at a word boundary on both sides.
/// Both inputs are assumed already lowercased; `needle` may itself contain
/// internal spaces (multi-word aliases like "jump crypto").
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_boundary = |c: Option<char>| !matches!(c, Some(c) if c.is_alphanumeric());

    let mut start = 0;
    while let Some(rel_pos) = haystack[start..].find(needle) {
        let pos = start + rel_pos;
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            return true;
        }
        start = pos + 1;
        if start >= haystack.len() {
            break;
        }
    }
    false
}
