//! Stage 3 of the pipeline (spec §4.3): feature extraction and the
//! composite weighted score for each candidate narrative.

pub mod breadth;
pub mod credibility;
pub mod cross_domain;
pub mod novelty;
pub mod single_source;
pub mod spam;
pub mod velocity;

use std::collections::{BTreeSet, HashSet};

use narrative_common::text::round3;
use narrative_types::config::PipelineConfig;
use narrative_types::{Domain, Features, Narrative, RankedNarrative, ScoreBreakdown, SignalEvent, SourceTag};
use rayon::prelude::*;
use tracing::debug;

/// Everything the scorer needs beyond the narrative itself: the baseline
/// window's events (used by both velocity and novelty) and the window
/// lengths that turn member counts into rates.
pub struct ScoringContext<'a> {
    pub baseline_events: &'a [SignalEvent],
    pub window_days: f64,
    pub baseline_days: f64,
}

/// Score every candidate narrative, in parallel (spec §5: per-narrative
/// scoring is an internally parallel fork-join section). Output order
/// matches input order; callers sort separately via `rank`.
pub fn score_all(
    candidates: &[Narrative],
    events_by_id: &std::collections::HashMap<&str, &SignalEvent>,
    ctx: &ScoringContext<'_>,
    cfg: &PipelineConfig,
) -> Vec<RankedNarrative> {
    candidates
        .par_iter()
        .map(|narrative| score_one(narrative, events_by_id, ctx, cfg))
        .collect()
}

fn score_one(
    narrative: &Narrative,
    events_by_id: &std::collections::HashMap<&str, &SignalEvent>,
    ctx: &ScoringContext<'_>,
    cfg: &PipelineConfig,
) -> RankedNarrative {
    let members: Vec<&SignalEvent> = narrative
        .members
        .iter()
        .filter_map(|id| events_by_id.get(id.as_str()).copied())
        .collect();

    let baseline_overlap: Vec<&SignalEvent> = ctx
        .baseline_events
        .iter()
        .filter(|e| !e.entities.is_disjoint(&narrative.entities))
        .collect();

    let r_w = members.len() as f64 / ctx.window_days.max(f64::EPSILON);
    let r_b = baseline_overlap.len() as f64 / ctx.baseline_days.max(f64::EPSILON);
    let velocity = velocity::velocity(r_w, r_b, cfg.scoring.velocity_a_max);

    let distinct_entities = narrative.entities.len();
    let distinct_sources: HashSet<SourceTag> = members.iter().map(|e| e.source).collect();
    let distinct_authors: HashSet<&str> = members
        .iter()
        .filter_map(|e| e.author.as_deref())
        .collect();
    let breadth = breadth::breadth(
        distinct_entities,
        distinct_sources.len(),
        distinct_authors.len(),
        &cfg.scoring.diversity,
        &cfg.scoring.diversity_caps,
    );

    let n_on = members.iter().filter(|e| e.domain == Domain::Onchain).count();
    let n_off = members.len() - n_on;
    let distinct_offchain_tags: HashSet<SourceTag> = members
        .iter()
        .filter(|e| e.domain == Domain::Offchain)
        .map(|e| e.source)
        .collect();
    let cross = cross_domain::cross_domain(
        n_on,
        n_off,
        distinct_offchain_tags.len(),
        cfg.scoring.offchain_subtype_cap,
    );

    let baseline_entities: BTreeSet<String> = ctx
        .baseline_events
        .iter()
        .flat_map(|e| e.entities.iter().cloned())
        .collect();
    let novelty = novelty::novelty(&narrative.entities, &baseline_entities, cfg.scoring.novelty_floor);

    let credibility = credibility::credibility(&members, &cfg.credibility);

    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = members.iter().map(|e| e.timestamp).collect();
    let authors: Vec<Option<&str>> = members.iter().map(|e| e.author.as_deref()).collect();
    let spam_penalty = spam::spam_penalty(
        &timestamps,
        &authors,
        cfg.scoring.burst_threshold,
        cfg.scoring.author_dominance_threshold,
    );

    let sources: Vec<SourceTag> = members.iter().map(|e| e.source).collect();
    let single_source_penalty =
        single_source::single_source_penalty(&sources, cfg.scoring.single_source_threshold);

    let features = Features {
        velocity: round3(velocity),
        breadth: round3(breadth),
        cross: round3(cross),
        novelty: round3(novelty),
        credibility: round3(credibility),
        spam_penalty: round3(spam_penalty),
        single_source_penalty: round3(single_source_penalty),
    };

    let w = &cfg.weights;
    let p = &cfg.penalties;
    let raw_total = w.velocity * velocity + w.breadth * breadth + w.cross * cross
        + w.novelty * novelty
        + w.credibility * credibility
        - p.spam * spam_penalty
        - p.single_source * single_source_penalty;
    let score = raw_total.clamp(0.0, 1.0);

    let breakdown = ScoreBreakdown {
        velocity: round3(w.velocity * velocity),
        breadth: round3(w.breadth * breadth),
        cross: round3(w.cross * cross),
        novelty: round3(w.novelty * novelty),
        credibility: round3(w.credibility * credibility),
        spam_penalty: round3(-p.spam * spam_penalty),
        single_source_penalty: round3(-p.single_source * single_source_penalty),
        raw_total: round3(raw_total),
    };
    let score = round3(score);

    RankedNarrative {
        label: narrative.label.clone(),
        entities: narrative.entities.clone(),
        members: narrative.members.clone(),
        window: narrative.window,
        features,
        score,
        // Explainer fills these in downstream; scorer leaves a neutral
        // placeholder rather than a sentinel value that could be mistaken
        // for a real confidence/evidence/why-now result.
        confidence: narrative_types::Confidence {
            tier: narrative_types::ConfidenceTier::Low,
            value: 0.0,
        },
        evidence: Vec::new(),
        why_now: String::new(),
        score_breakdown: breakdown,
    }
}

/// Descending score, ties broken by larger member count then lexicographic
/// label (spec §4.3). Must be a total order over identical input, every run.
pub fn rank(mut narratives: Vec<RankedNarrative>) -> Vec<RankedNarrative> {
    narratives.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.members.len().cmp(&a.members.len()))
            .then_with(|| a.label.cmp(&b.label))
    });
    debug!(count = narratives.len(), "narratives ranked");
    narratives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrative(label: &str, score: f64, member_count: usize) -> RankedNarrative {
        RankedNarrative {
            label: label.to_string(),
            entities: BTreeSet::new(),
            members: (0..member_count).map(|i| i.to_string()).collect(),
            window: (chrono::Utc::now(), chrono::Utc::now()),
            features: Features {
                velocity: 0.0,
                breadth: 0.0,
                cross: 0.0,
                novelty: 0.0,
                credibility: 0.0,
                spam_penalty: 0.0,
                single_source_penalty: 0.0,
            },
            score,
            confidence: narrative_types::Confidence {
                tier: narrative_types::ConfidenceTier::Low,
                value: 0.0,
            },
            evidence: Vec::new(),
            why_now: String::new(),
            score_breakdown: ScoreBreakdown {
                velocity: 0.0,
                breadth: 0.0,
                cross: 0.0,
                novelty: 0.0,
                credibility: 0.0,
                spam_penalty: 0.0,
                single_source_penalty: 0.0,
                raw_total: score,
            },
        }
    }

    #[test]
    fn higher_score_ranks_first() {
        let ranked = rank(vec![narrative("A", 0.3, 5), narrative("B", 0.8, 5)]);
        assert_eq!(ranked[0].label, "B");
    }

    #[test]
    fn tie_broken_by_member_count_then_label() {
        let ranked = rank(vec![
            narrative("Zeta", 0.5, 3),
            narrative("Alpha", 0.5, 7),
            narrative("Beta", 0.5, 7),
        ]);
        assert_eq!(ranked[0].label, "Alpha");
        assert_eq!(ranked[1].label, "Beta");
        assert_eq!(ranked[2].label, "Zeta");
    }

    #[test]
    fn ordering_is_stable_across_repeated_calls() {
        let input = vec![narrative("A", 0.5, 5), narrative("B", 0.5, 5), narrative("C", 0.9, 1)];
        let first = rank(input.clone());
        let second = rank(input);
        let first_labels: Vec<&str> = first.iter().map(|n| n.label.as_str()).collect();
        let second_labels: Vec<&str> = second.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(first_labels, second_labels);
    }
}
