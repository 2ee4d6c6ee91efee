//! S5 - Near-duplicate collapse, and the normalizer's idempotence property
//! (spec §8 #7), exercised through the crate's public `normalize` entry point.

use std::collections::BTreeMap;

use narrative_normalizer::raw::RawEvent;
use narrative_normalizer::{normalize, NormalizerConfig};
use narrative_types::config::AliasTable;
use narrative_types::SourceTag;

fn raw(id: &str, title: &str, minute: u32) -> RawEvent {
    RawEvent {
        id: id.to_string(),
        source: SourceTag::Github,
        timestamp: Some(format!("2024-01-01T00:{minute:02}:00Z").parse().unwrap()),
        title: Some(title.to_string()),
        text: Some("body text".to_string()),
        url: None,
        author: None,
        metrics: BTreeMap::new(),
        relevance: 1.0,
    }
}

fn cfg(aliases: &AliasTable) -> NormalizerConfig<'_> {
    NormalizerConfig {
        aliases,
        bucket_minutes: 5,
        near_sim_threshold: 0.85,
        near_dup_window_hours: 6,
    }
}

#[test]
fn s5_near_duplicate_titles_one_minute_apart_collapse_to_one_event() {
    let aliases = AliasTable::default();
    let events = vec![
        raw("a", "Foo ships v1.0 on mainnet", 0),
        raw("b", "Foo ships v1.0 on mainnet!", 1),
    ];
    let (retained, report) = normalize(events, &cfg(&aliases));
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0].id, "a");
    assert_eq!(report.near_duplicates_dropped, 1);
}

#[test]
fn normalizer_is_idempotent_on_its_own_output() {
    let aliases = AliasTable::default();
    let events = vec![
        raw("a", "Alpha announcement", 0),
        raw("b", "Totally unrelated headline", 10),
    ];
    let (first_pass, _) = normalize(events, &cfg(&aliases));

    let replay: Vec<RawEvent> = first_pass
        .iter()
        .map(|e| RawEvent {
            id: e.id.clone(),
            source: e.source,
            timestamp: Some(e.timestamp),
            title: Some(e.title.clone()),
            text: Some(e.text.clone()),
            url: e.url.clone(),
            author: e.author.clone(),
            metrics: e.metrics.clone(),
            relevance: e.relevance,
        })
        .collect();
    let (second_pass, report) = normalize(replay, &cfg(&aliases));

    assert_eq!(first_pass.len(), second_pass.len());
    assert_eq!(report.exact_duplicates_dropped, 0);
    assert_eq!(report.near_duplicates_dropped, 0);
}
