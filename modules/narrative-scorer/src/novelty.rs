//! Novelty: fraction of a narrative's entities unseen in the baseline
//! window, with a floor to avoid zeroing out long-standing narratives
//! (spec §4.3).

use std::collections::BTreeSet;

pub fn novelty(entities: &BTreeSet<String>, baseline_entities: &BTreeSet<String>, floor: f64) -> f64 {
    if entities.is_empty() {
        return floor;
    }
    let unseen = entities.difference(baseline_entities).count();
    let fraction = unseen as f64 / entities.len() as f64;
    fraction.max(floor)
}
