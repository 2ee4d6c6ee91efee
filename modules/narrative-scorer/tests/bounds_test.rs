//! Score-bound and penalty-direction invariants (spec §8 properties #3, #6,
//! #10), exercised through the crate's public `score_all` entry point rather
//! than the individual feature functions.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, TimeZone, Utc};
use narrative_scorer::{score_all, ScoringContext};
use narrative_types::config::PipelineConfig;
use narrative_types::{Narrative, SignalEvent, SourceTag};

fn ts(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour as i64)
}

fn make_event(id: &str, source: SourceTag, hour: u32, author: &str) -> SignalEvent {
    SignalEvent::new(id, source, ts(hour), format!("headline {id}"), "body", 1.0).with_author(author)
}

// Property #3: every feature and the composite score must land in [0, 1].
#[test]
fn features_and_score_are_bounded_in_unit_interval() {
    let cfg = PipelineConfig::default();
    let events: Vec<SignalEvent> = (0..12)
        .map(|i| {
            let source = if i % 3 == 0 {
                SourceTag::TxActivity
            } else if i % 3 == 1 {
                SourceTag::Github
            } else {
                SourceTag::Twitter
            };
            make_event(&format!("e{i}"), source, i, &format!("author-{}", i % 4))
        })
        .collect();
    let events_by_id: HashMap<&str, &SignalEvent> = events.iter().map(|e| (e.id.as_str(), e)).collect();
    let entities: BTreeSet<String> = ["Solana", "Firedancer"].into_iter().map(String::from).collect();
    let narrative = Narrative {
        label: "Test".to_string(),
        entities,
        members: events.iter().map(|e| e.id.clone()).collect(),
        window: (ts(0), ts(11)),
    };
    let ctx = ScoringContext {
        baseline_events: &[],
        window_days: 3.0,
        baseline_days: 9.0,
    };

    let scored = score_all(&[narrative], &events_by_id, &ctx, &cfg);
    assert_eq!(scored.len(), 1);
    let n = &scored[0];
    assert!((0.0..=1.0).contains(&n.score), "score {} out of bounds", n.score);
    for (name, value) in [
        ("velocity", n.features.velocity),
        ("breadth", n.features.breadth),
        ("cross", n.features.cross),
        ("novelty", n.features.novelty),
        ("credibility", n.features.credibility),
        ("spam_penalty", n.features.spam_penalty),
        ("single_source_penalty", n.features.single_source_penalty),
    ] {
        assert!((0.0..=1.0).contains(&value), "feature {name} = {value} out of bounds");
    }
}

// Property #6: identical narratives except for one penalty term -> the one
// with the higher penalty must score lower.
#[test]
fn higher_penalty_yields_lower_score() {
    let cfg = PipelineConfig::default();

    // Calm narrative: 10 members, one per hour, distinct authors.
    let calm_events: Vec<SignalEvent> = (0..10)
        .map(|i| make_event(&format!("calm-{i}"), SourceTag::Github, i, &format!("author-{i}")))
        .collect();
    // Bursty narrative: same member count and sources, but 8 of the 10
    // authored by the same account (author dominance penalty fires).
    let bursty_events: Vec<SignalEvent> = (0..10)
        .map(|i| {
            let author = if i < 8 { "dominant".to_string() } else { format!("author-{i}") };
            make_event(&format!("bursty-{i}"), SourceTag::Github, i, &author)
        })
        .collect();

    let mut events = calm_events.clone();
    events.extend(bursty_events.clone());
    let events_by_id: HashMap<&str, &SignalEvent> = events.iter().map(|e| (e.id.as_str(), e)).collect();

    let entities: BTreeSet<String> = ["Solana"].into_iter().map(String::from).collect();
    let calm = Narrative {
        label: "Calm".to_string(),
        entities: entities.clone(),
        members: calm_events.iter().map(|e| e.id.clone()).collect(),
        window: (ts(0), ts(9)),
    };
    let bursty = Narrative {
        label: "Bursty".to_string(),
        entities,
        members: bursty_events.iter().map(|e| e.id.clone()).collect(),
        window: (ts(0), ts(9)),
    };

    let ctx = ScoringContext {
        baseline_events: &[],
        window_days: 3.0,
        baseline_days: 9.0,
    };
    let scored = score_all(&[calm, bursty], &events_by_id, &ctx, &cfg);
    let calm_scored = scored.iter().find(|n| n.label == "Calm").unwrap();
    let bursty_scored = scored.iter().find(|n| n.label == "Bursty").unwrap();

    assert!(bursty_scored.features.spam_penalty > calm_scored.features.spam_penalty);
    assert!(
        bursty_scored.score < calm_scored.score,
        "higher-penalty narrative ({}) must score below the calm one ({})",
        bursty_scored.score,
        calm_scored.score
    );
}

// Property #10: an all-offchain narrative has cross = 0, regardless of
// offchain source-tag spread.
#[test]
fn all_offchain_narrative_has_zero_cross() {
    let cfg = PipelineConfig::default();
    let events: Vec<SignalEvent> = (0..6)
        .map(|i| {
            let source = if i % 2 == 0 { SourceTag::Github } else { SourceTag::Twitter };
            make_event(&format!("e{i}"), source, i, &format!("author-{i}"))
        })
        .collect();
    let events_by_id: HashMap<&str, &SignalEvent> = events.iter().map(|e| (e.id.as_str(), e)).collect();
    let entities: BTreeSet<String> = ["Solana"].into_iter().map(String::from).collect();
    let narrative = Narrative {
        label: "Offchain".to_string(),
        entities,
        members: events.iter().map(|e| e.id.clone()).collect(),
        window: (ts(0), ts(5)),
    };
    let ctx = ScoringContext {
        baseline_events: &[],
        window_days: 3.0,
        baseline_days: 9.0,
    };
    let scored = score_all(&[narrative], &events_by_id, &ctx, &cfg);
    assert_eq!(scored[0].features.cross, 0.0);
}
