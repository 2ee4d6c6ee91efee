//! Breadth: a weighted mixture of entity, source, and author diversity
//! within a narrative's members (spec §4.3).

use narrative_types::config::{DiversityCaps, DiversityConfig};

/// Each raw count is normalized by its cap and clamped to 1.0 before the
/// configured weights are applied.
pub fn breadth(
    distinct_entities: usize,
    distinct_sources: usize,
    distinct_authors: usize,
    weights: &DiversityConfig,
    caps: &DiversityCaps,
) -> f64 {
    let entity_diversity = (distinct_entities as f64 / caps.entities).min(1.0);
    let source_diversity = (distinct_sources as f64 / caps.sources).min(1.0);
    let author_diversity = (distinct_authors as f64 / caps.authors).min(1.0);

    weights.entities * entity_diversity
        + weights.sources * source_diversity
        + weights.authors * author_diversity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_weights() -> DiversityConfig {
        DiversityConfig::default()
    }

    fn default_caps() -> DiversityCaps {
        DiversityCaps::default()
    }

    #[test]
    fn zero_diversity_is_zero() {
        assert_eq!(breadth(0, 0, 0, &default_weights(), &default_caps()), 0.0);
    }

    #[test]
    fn counts_at_or_above_cap_saturate() {
        let b = breadth(8, 5, 10, &default_weights(), &default_caps());
        assert!((b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn counts_beyond_cap_do_not_exceed_one() {
        let b = breadth(50, 50, 50, &default_weights(), &default_caps());
        assert!((b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_sum_to_one_at_full_saturation() {
        let w = default_weights();
        assert!((w.entities + w.sources + w.authors - 1.0).abs() < 1e-9);
    }

    #[test]
    fn more_entity_diversity_increases_breadth() {
        let low = breadth(1, 1, 1, &default_weights(), &default_caps());
        let high = breadth(8, 1, 1, &default_weights(), &default_caps());
        assert!(high > low);
    }
}
