//! S6 - Label determinism: a cluster with entity counts
//! `{Firedancer: 6, Jump Crypto: 4, Solana Validators: 4}` must label as
//! "Firedancer & Jump Crypto" (count order, then lexicographic tiebreak),
//! exercised through the full `cluster()` entry point rather than the
//! label generator in isolation.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use narrative_clusterer::{cluster, ClustererConfig};
use narrative_types::{SignalEvent, SourceTag};

fn event(id: &str, hour: u32, entities: &[&str]) -> SignalEvent {
    SignalEvent::new(
        id,
        SourceTag::Github,
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        format!("headline {id}"),
        "body text".to_string(),
        1.0,
    )
    .with_canonical_entities(entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>())
}

fn cfg() -> ClustererConfig {
    ClustererConfig {
        min_entity_support: 2,
        edge_threshold: 0.30,
        text_distance_threshold: 0.55,
        min_text_support: 3,
        min_cluster_size: 3,
    }
}

#[test]
fn s6_label_determinism() {
    let mut events = Vec::new();
    // 2 events co-occurring all three entities.
    for i in 0..2 {
        events.push(event(&format!("co-{i}"), i, &["Firedancer", "Jump Crypto", "Solana Validators"]));
    }
    // 4 more Firedancer-only events (total Firedancer support: 6).
    for i in 0..4 {
        events.push(event(&format!("f-{i}"), i + 2, &["Firedancer"]));
    }
    // 2 more Jump Crypto-only events (total: 4).
    for i in 0..2 {
        events.push(event(&format!("j-{i}"), i + 6, &["Jump Crypto"]));
    }
    // 2 more Solana Validators-only events (total: 4).
    for i in 0..2 {
        events.push(event(&format!("s-{i}"), i + 8, &["Solana Validators"]));
    }

    let narratives = cluster(&events, &cfg());
    assert_eq!(narratives.len(), 1);
    assert_eq!(narratives[0].members.len(), 10);
    assert_eq!(narratives[0].label, "Firedancer & Jump Crypto");
}
