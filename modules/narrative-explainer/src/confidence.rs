//! Confidence tier scoring (spec §4.4): a 0-100 point accumulation,
//! clamped and bucketed into low/moderate/strong.

use narrative_types::{Confidence, ConfidenceTier, Features};

pub struct ConfidenceInputs {
    pub member_count: usize,
    pub both_domains_present: bool,
    pub distinct_source_tags: usize,
}

pub fn score(inputs: &ConfidenceInputs, features: &Features) -> Confidence {
    let mut points: f64 = 0.0;

    if inputs.member_count >= 10 {
        points += 40.0;
    } else if inputs.member_count >= 5 {
        points += 25.0;
    } else if inputs.member_count >= 3 {
        points += 10.0;
    }

    if inputs.both_domains_present {
        points += 25.0;
    }

    if inputs.distinct_source_tags >= 3 {
        points += 15.0;
    } else if inputs.distinct_source_tags >= 2 {
        points += 8.0;
    }

    if features.single_source_penalty > 0.0 {
        points -= 30.0;
    }
    if features.spam_penalty > 0.0 {
        points -= 20.0;
    }

    let value = points.clamp(0.0, 100.0);
    let tier = if value >= 80.0 {
        ConfidenceTier::Strong
    } else if value >= 55.0 {
        ConfidenceTier::Moderate
    } else {
        ConfidenceTier::Low
    };

    Confidence { tier, value }
}
