//! Cluster label generation (spec §4.2): the two entities with the highest
//! intra-cluster event count, `Title Case & Title Case`, ties broken
//! lexicographically.

use std::collections::BTreeMap;

use narrative_common::text::title_case;

fn format_entity(entity: &str) -> String {
    entity.split(' ').map(title_case).collect::<Vec<_>>().join(" ")
}

/// `entity_counts` maps each cluster entity to how many member events
/// contain it. Returns the formatted label.
pub fn generate_label(entity_counts: &BTreeMap<String, usize>) -> String {
    if entity_counts.is_empty() {
        return "Unlabeled".to_string();
    }

    let mut ranked: Vec<(&String, &usize)> = entity_counts.iter().collect();
    ranked.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
    });

    if ranked.len() == 1 {
        return format_entity(ranked[0].0);
    }

    format!(
        "{} & {}",
        format_entity(ranked[0].0),
        format_entity(ranked[1].0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn single_entity_label_has_no_ampersand() {
        let label = generate_label(&counts(&[("solana", 5)]));
        assert_eq!(label, "Solana");
    }

    #[test]
    fn two_entities_joined_by_ampersand_highest_count_first() {
        let label = generate_label(&counts(&[("firedancer", 3), ("jump crypto", 7)]));
        assert_eq!(label, "Jump Crypto & Firedancer");
    }

    #[test]
    fn ties_broken_lexicographically() {
        let label = generate_label(&counts(&[("zeta", 4), ("alpha", 4), ("beta", 1)]));
        assert_eq!(label, "Alpha & Zeta");
    }

    #[test]
    fn empty_counts_falls_back_to_unlabeled() {
        assert_eq!(generate_label(&BTreeMap::new()), "Unlabeled");
    }
}
