//! SingleSourcePenalty: discourages narratives dominated by one source
//! channel even when they pass the spam detectors (spec §4.3).

use narrative_types::SourceTag;
use std::collections::HashMap;

/// `threshold` default 0.7, slope `10/3` so a narrative entirely from one
/// source (share = 1.0) gets the full 1.0 penalty.
pub fn single_source_penalty(sources: &[SourceTag], threshold: f64) -> f64 {
    if sources.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<SourceTag, usize> = HashMap::new();
    for source in sources {
        *counts.entry(*source).or_insert(0) += 1;
    }
    let total = sources.len() as f64;
    let max_share = counts.values().copied().max().unwrap_or(0) as f64 / total;
    if max_share > threshold {
        ((max_share - threshold) * (10.0 / 3.0)).min(1.0)
    } else {
        0.0
    }
}
