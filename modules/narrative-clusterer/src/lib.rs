//! Stage 2 of the pipeline (spec §4.2): candidate narratives from entity
//! co-occurrence (phase 1) merged with text-similarity clusters of
//! unanchored events (phase 2).

pub mod graph;
pub mod hac;
pub mod label;
pub mod tfidf;

use std::collections::{BTreeMap, BTreeSet};

use narrative_types::{Narrative, SignalEvent};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ClustererConfig {
    pub min_entity_support: usize,
    pub edge_threshold: f64,
    pub text_distance_threshold: f64,
    pub min_text_support: usize,
    pub min_cluster_size: usize,
}

/// Produce candidate narratives from normalized events. `events` should be
/// the normalizer's output; cluster membership is keyed by `SignalEvent::id`.
pub fn cluster(events: &[SignalEvent], cfg: &ClustererConfig) -> Vec<Narrative> {
    let entity_clusters = phase1_entity_clusters(events, cfg);
    let text_clusters = phase2_text_clusters(events, cfg);

    let mut candidates: Vec<Narrative> = entity_clusters;
    candidates.extend(merge_or_append(text_clusters, &candidates));

    let before = candidates.len();
    candidates.retain(|n| n.members.len() >= cfg.min_cluster_size);
    debug!(
        candidates_before_filter = before,
        candidates_after_filter = candidates.len(),
        "clustering complete"
    );

    candidates.sort_by(|a, b| a.label.cmp(&b.label));
    candidates
}

fn phase1_entity_clusters(events: &[SignalEvent], cfg: &ClustererConfig) -> Vec<Narrative> {
    let entity_sets: Vec<&BTreeSet<String>> = events.iter().map(|e| &e.entities).collect();
    let components =
        graph::build_cooccurrence_graph(entity_sets.into_iter(), cfg.min_entity_support, cfg.edge_threshold);

    components
        .into_iter()
        .map(|component_entities| {
            let component_set: BTreeSet<String> = component_entities.into_iter().collect();
            build_narrative_from_entities(events, component_set)
        })
        .collect()
}

fn build_narrative_from_entities(events: &[SignalEvent], entities: BTreeSet<String>) -> Narrative {
    let members: Vec<&SignalEvent> = events
        .iter()
        .filter(|e| !e.entities.is_disjoint(&entities))
        .collect();

    let mut entity_counts: BTreeMap<String, usize> = BTreeMap::new();
    for member in &members {
        for entity in member.entities.intersection(&entities) {
            *entity_counts.entry(entity.clone()).or_insert(0) += 1;
        }
    }

    let label = label::generate_label(&entity_counts);
    let window = member_window(&members);

    Narrative {
        label,
        entities,
        members: members.iter().map(|e| e.id.clone()).collect(),
        window,
    }
}

fn phase2_text_clusters(events: &[SignalEvent], cfg: &ClustererConfig) -> Vec<Narrative> {
    let unanchored: Vec<&SignalEvent> = events.iter().filter(|e| e.unanchored).collect();
    if unanchored.is_empty() {
        return Vec::new();
    }

    let documents: Vec<String> = unanchored
        .iter()
        .map(|e| format!("{} {}", e.title, e.text))
        .collect();
    let corpus = tfidf::vectorize(&documents, 2, 0.8);
    let raw_clusters = hac::cluster(&corpus.vectors, cfg.text_distance_threshold);

    raw_clusters
        .into_iter()
        .filter(|indices| indices.len() >= cfg.min_text_support)
        .map(|indices| {
            let members: Vec<&SignalEvent> = indices.iter().map(|&i| unanchored[i]).collect();
            let window = member_window(&members);
            Narrative {
                // Text-only clusters have no matched entities by definition
                // (spec §4.1): `label::generate_label` falls back to
                // "Unlabeled" on an empty entity-count table.
                label: label::generate_label(&BTreeMap::new()),
                entities: BTreeSet::new(),
                members: members.iter().map(|e| e.id.clone()).collect(),
                window,
            }
        })
        .collect()
}

fn member_window(members: &[&SignalEvent]) -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    let min = members.iter().map(|e| e.timestamp).min();
    let max = members.iter().map(|e| e.timestamp).max();
    match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            let now = members
                .first()
                .map(|e| e.timestamp)
                .unwrap_or_else(|| chrono::DateTime::<chrono::Utc>::MIN_UTC);
            (now, now)
        }
    }
}

/// Merge a text cluster into an entity cluster if their modal matched-entity
/// sets overlap (spec §4.2); otherwise the text cluster stands alone. In
/// practice an unanchored event's entity set is always empty, so this is a
/// structural no-op today — it is kept so a future relaxation of
/// "unanchored" (e.g. partial matches) merges correctly without a rewrite.
fn merge_or_append(text_clusters: Vec<Narrative>, entity_clusters: &[Narrative]) -> Vec<Narrative> {
    let mut result = Vec::new();
    'clusters: for text_cluster in text_clusters {
        for entity_cluster in entity_clusters {
            if !text_cluster.entities.is_disjoint(&entity_cluster.entities) {
                continue 'clusters;
            }
        }
        result.push(text_cluster);
    }
    result
}
